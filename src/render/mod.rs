use serde::Serialize;

use crate::catalog::Product;

// Card previews truncate the name to 25 characters and the description to 80.
pub const NAME_PREVIEW_CHARS: usize = 25;
pub const DESC_PREVIEW_CHARS: usize = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// One listing card. `index` and `id` are the parameters of the card's edit
/// and delete actions; `id` defaults to 0 when the record has none.
#[derive(Clone, Debug, Serialize)]
pub struct ProductCard {
    pub index: usize,
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max).collect();
    out.push_str("...");
    out
}

pub fn build_cards(products: &[Product]) -> Vec<ProductCard> {
    products
        .iter()
        .enumerate()
        .map(|(index, p)| ProductCard {
            index,
            id: p.display_id(),
            name: truncate_chars(&p.name, NAME_PREVIEW_CHARS),
            category: p.category.clone(),
            price: p.price,
            description: truncate_chars(&p.description, DESC_PREVIEW_CHARS),
            image: p.image.clone(),
        })
        .collect()
}

pub fn render_text(cards: &[ProductCard]) -> Vec<u8> {
    let mut out = String::new();
    for card in cards {
        out.push_str(&format!(
            "[{}] #{} {}\n    category: {}  price: ${:.2}\n",
            card.index, card.id, card.name, card.category, card.price
        ));
        if !card.description.is_empty() {
            out.push_str(&format!("    {}\n", card.description));
        }
    }
    out.into_bytes()
}

pub fn render_json(cards: &[ProductCard]) -> Vec<u8> {
    serde_json::to_vec_pretty(cards).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_html(cards: &[ProductCard]) -> Vec<u8> {
    let mut body = String::new();
    for card in cards {
        body.push_str(&format!(
            r#"    <div class="card">
      <div class="card-header">
        <img src="{image}" alt="{name}"/>
        <h3>{name}</h3>
      </div>
      <div class="card-body">
        <div class="row"><span class="label">Category:</span> {category}</div>
        <div class="row"><span class="label">Price:</span> $ {price:.2}</div>
        <div class="row"><span class="label">Desc:</span> {description}</div>
      </div>
      <div class="card-footer">
        <button class="action" data-action="edit" data-index="{index}" data-id="{id}">Edit</button>
        <button class="action" data-action="delete" data-index="{index}" data-id="{id}">Delete</button>
      </div>
    </div>
"#,
            image = escape_html(&card.image),
            name = escape_html(&card.name),
            category = escape_html(&card.category),
            price = card.price,
            description = escape_html(&card.description),
            index = card.index,
            id = card.id,
        ));
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Shopkeeper Catalog</title>
  <style>
    body {{ font-family: sans-serif; background: #f8fafc; margin: 0; padding: 2rem; }}
    h1 {{ margin: 0 0 1.5rem; }}
    .cards {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }}
    .card {{ background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; overflow: hidden; }}
    .card-header {{ display: flex; align-items: center; gap: 0.75rem; padding: 0.75rem; background: #135bec; color: #fff; }}
    .card-header img {{ width: 40px; height: 40px; object-fit: cover; border-radius: 4px; background: #fff; }}
    .card-header h3 {{ margin: 0; font-size: 0.95rem; }}
    .card-body {{ padding: 0.75rem; }}
    .row {{ margin-bottom: 0.35rem; font-size: 0.85rem; }}
    .label {{ font-weight: 600; }}
    .card-footer {{ padding: 0.75rem; border-top: 1px solid #e2e8f0; display: flex; gap: 0.5rem; }}
    .action {{ cursor: pointer; border: 1px solid #cbd5e1; background: #f1f5f9; border-radius: 4px; padding: 0.25rem 0.75rem; }}
  </style>
</head>
<body>
  <h1>Shopkeeper Catalog</h1>
  <div class="cards">
{body}  </div>
</body>
</html>"#,
    );

    html.into_bytes()
}
