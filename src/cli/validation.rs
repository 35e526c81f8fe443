use crate::cli::args::{CliArgs, Command};

pub fn parse_price(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("price is empty".to_string());
    }
    let price: f64 = trimmed
        .parse()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number".to_string());
    }
    Ok(price)
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(limit) = args.fetch_limit {
        if limit == 0 {
            return Err("invalid --fetch-limit, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    match &args.command {
        Command::Add(add) => {
            parse_price(&add.price).map_err(|e| format!("invalid --price '{}': {e}", add.price))?;
        }
        Command::Update(update) => {
            if let Some(raw) = update.price.as_deref() {
                parse_price(raw).map_err(|e| format!("invalid --price '{raw}': {e}"))?;
            }
        }
        _ => {}
    }
    Ok(())
}
