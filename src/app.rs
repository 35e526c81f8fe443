use clap::Parser;
use colored::Colorize;

use crate::bootstrap;
use crate::catalog::Catalog;
use crate::cli::args::{CliArgs, Command, ListArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::handlers::{self, CreateForm, UpdateForm};
use crate::remote::{OfflineMirror, RemoteApi, RemoteMirror, DEFAULT_API_BASE};
use crate::render::{self, OutputFormat, ProductCard};
use crate::storage::FileStorage;

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
      _                 _
  ___| |__   ___  _ __ | | _____  ___ _ __   ___ _ __
 / __| '_ \ / _ \| '_ \| |/ / _ \/ _ \ '_ \ / _ \ '__|
 \__ \ | | | (_) | |_) |   <  __/  __/ |_) |  __/ |
 |___/_| |_|\___/| .__/|_|\_\___|\___| .__/ \___|_|
                 |_|                 |_|
       v0.3.2 - local-first product catalog manager
    "#;
    print!("{}", BANNER);
    println!();
}

pub(crate) fn warn_line(message: &str) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "WRN".bold().yellow(),
        "]".bold().white(),
        message.white()
    );
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    store_dir: String,
    api_base: String,
    fetch_limit: usize,
    timeout: u64,
    offline: bool,
    no_color: bool,
    output: Option<String>,
    output_format: Option<String>,
}

fn build_run_config(args: &CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let offline = args.offline || cfg.offline.unwrap_or(false);

    let store_dir = args
        .store_dir
        .clone()
        .or(cfg.store_dir)
        .map(|p| config::expand_tilde_string(&p))
        .or_else(|| config::default_store_dir().map(|p| p.to_string_lossy().to_string()))
        .ok_or_else(|| "could not determine a store directory".to_string())?;

    let api_base = args
        .api_base
        .clone()
        .or(cfg.api_base)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let fetch_limit = args.fetch_limit.or(cfg.fetch_limit).unwrap_or(10);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);

    let output = cfg.output.map(|p| config::expand_tilde_string(&p));
    let output_format = cfg.output_format;

    Ok(RunConfig {
        store_dir,
        api_base,
        fetch_limit,
        timeout,
        offline,
        no_color,
        output,
        output_format,
    })
}

fn print_listing(cards: &[ProductCard]) {
    if cards.is_empty() {
        println!("{}", "catalog is empty".bold().white());
        return;
    }
    for card in cards {
        println!(
            "{} {} {}",
            format!("[{}]", card.index).bold().green(),
            format!("#{}", card.id).bold().cyan(),
            card.name.bold().white()
        );
        println!(
            "    {} {}   {} ${:.2}",
            "category:".bold().white(),
            card.category,
            "price:".bold().white(),
            card.price
        );
        if !card.description.is_empty() {
            println!("    {}", card.description);
        }
    }
}

async fn run_list(
    run: &RunConfig,
    catalog: &Catalog<FileStorage>,
    list: ListArgs,
) -> Result<(), String> {
    let cards = handlers::list_view(catalog).map_err(|e| e.to_string())?;

    let output = list
        .output
        .map(|p| config::expand_tilde_string(&p))
        .or_else(|| run.output.clone());
    let format_flag = list
        .output_format
        .as_deref()
        .or(run.output_format.as_deref())
        .and_then(render::OutputFormat::parse);

    if let Some(outfile_path) = output {
        let format = format_flag
            .or_else(|| render::infer_format_from_path(&outfile_path))
            .unwrap_or(OutputFormat::Text);
        let rendered = match format {
            OutputFormat::Text => render::render_text(&cards),
            OutputFormat::Json => render::render_json(&cards),
            OutputFormat::Html => render::render_html(&cards),
        };
        tokio::fs::write(&outfile_path, &rendered)
            .await
            .map_err(|e| format!("failed to write output file '{outfile_path}': {e}"))?;
        format_kv_line("Saved", &outfile_path);
        return Ok(());
    }

    match format_flag {
        Some(OutputFormat::Json) => {
            print!("{}", String::from_utf8_lossy(&render::render_json(&cards)));
        }
        Some(OutputFormat::Html) => {
            print!("{}", String::from_utf8_lossy(&render::render_html(&cards)));
        }
        Some(OutputFormat::Text) => {
            print!("{}", String::from_utf8_lossy(&render::render_text(&cards)));
        }
        None => print_listing(&cards),
    }
    Ok(())
}

async fn run_async(run: RunConfig, command: Command) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner(run.no_color);

    format_kv_line("Store", &run.store_dir);
    if run.offline {
        format_kv_line("Remote", "offline");
    } else {
        format_kv_line(
            "Remote",
            &format!(
                "{} limit={} timeout={}s",
                run.api_base, run.fetch_limit, run.timeout
            ),
        );
    }
    println!();

    let mut catalog = Catalog::new(FileStorage::new(&run.store_dir));

    let api;
    let offline_mirror;
    let mirror: &(dyn RemoteMirror + Sync) = if run.offline {
        offline_mirror = OfflineMirror;
        &offline_mirror
    } else {
        api = RemoteApi::new(&run.api_base, run.timeout).map_err(|e| e.to_string())?;
        &api
    };

    // Every view starts by giving the bootstrap loader a chance, exactly
    // once per store lifetime.
    bootstrap::ensure_seeded(&mut catalog, mirror, run.fetch_limit, !run.offline)
        .await
        .map_err(|e| e.to_string())?;

    match command {
        Command::List(list) => {
            run_list(&run, &catalog, list).await?;
        }
        Command::Add(add) => {
            let price = validation::parse_price(&add.price)?;
            let form = CreateForm {
                name: add.name,
                category: add.category,
                price,
                description: add.description,
                photo: add.photo.map(|p| config::expand_tilde(&p)),
            };
            handlers::create_product(&mut catalog, mirror, form)
                .await
                .map_err(|e| e.to_string())?;
            print_listing(&handlers::list_view(&catalog).map_err(|e| e.to_string())?);
        }
        Command::Edit(edit) => {
            match handlers::begin_edit(&mut catalog, edit.index).map_err(|e| e.to_string())? {
                Some(view) => {
                    format_kv_line("Editing", &format!("position {}", view.index));
                    format_kv_line("Name", &view.product.name);
                    format_kv_line("Category", &view.product.category);
                    format_kv_line("Price", &format!("{:.2}", view.product.price));
                    format_kv_line("Desc", &view.product.description);
                    format_kv_line("Image", &render::truncate_chars(&view.product.image, 60));
                    println!();
                    println!(
                        "{}",
                        "submit changes with `shopkeeper update`".bold().white()
                    );
                }
                None => {
                    print_listing(&handlers::list_view(&catalog).map_err(|e| e.to_string())?);
                }
            }
        }
        Command::Update(update) => {
            let price = match update.price.as_deref() {
                Some(raw) => Some(validation::parse_price(raw)?),
                None => None,
            };
            let form = UpdateForm {
                name: update.name,
                category: update.category,
                price,
                description: update.description,
                photo: update.photo.map(|p| config::expand_tilde(&p)),
            };
            handlers::update_product(&mut catalog, mirror, form)
                .await
                .map_err(|e| e.to_string())?;
            print_listing(&handlers::list_view(&catalog).map_err(|e| e.to_string())?);
        }
        Command::Delete(delete) => {
            // The delete action is parameterized by position and identifier,
            // resolved from the listing the same way a card button would be.
            let cards = handlers::list_view(&catalog).map_err(|e| e.to_string())?;
            let id = cards
                .iter()
                .find(|c| c.index == delete.index)
                .map(|c| c.id)
                .unwrap_or(0);
            handlers::delete_product(&mut catalog, mirror, delete.index, id)
                .await
                .map_err(|e| e.to_string())?;
            print_listing(&handlers::list_view(&catalog).map_err(|e| e.to_string())?);
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    return Ok(());
                }
                _ => return Err(e.to_string()),
            }
        }
    };

    let cfg = match args.config.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            config::load_config(&path, false)?
        }
        None => match config::default_config_path() {
            Some(path) => {
                if let Err(e) = config::ensure_default_config_file(&path) {
                    warn_line(&e);
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(&args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run, args.command))
}
