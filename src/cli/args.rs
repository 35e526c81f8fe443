use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shopkeeper",
    version,
    about = "local-first product catalog manager",
    long_about = "Shopkeeper manages a product catalog in a local store, mirroring every mutation to a remote demo API on a best-effort basis.\n\nExamples:\n  shopkeeper list\n  shopkeeper add --name Mug --category kitchen --price 4.50\n  shopkeeper edit 0\n  shopkeeper update --price 12.50\n  shopkeeper delete 0\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.shopkeeper/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 's',
        long = "sd",
        visible_alias = "store-dir",
        value_name = "DIR",
        global = true,
        help_heading = "Store",
        help = "Local store directory (defaults to ~/.shopkeeper/store)."
    )]
    pub store_dir: Option<String>,

    #[arg(
        short = 'a',
        long = "api",
        visible_alias = "api-base",
        value_name = "URL",
        global = true,
        help_heading = "Remote",
        help = "Base URL of the remote listing endpoint."
    )]
    pub api_base: Option<String>,

    #[arg(
        short = 'l',
        long = "lim",
        visible_alias = "fetch-limit",
        value_name = "N",
        global = true,
        help_heading = "Remote",
        help = "Number of items requested when seeding an empty store."
    )]
    pub fetch_limit: Option<usize>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Remote",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'O',
        long = "off",
        visible_alias = "offline",
        global = true,
        help_heading = "Remote",
        help = "Suppress all remote traffic (seeding and mirroring)."
    )]
    pub offline: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the product listing.
    List(ListArgs),
    /// Add a product to the catalog.
    Add(AddArgs),
    /// Start editing the product at a listing position.
    Edit(EditArgs),
    /// Submit the pending edit.
    Update(UpdateArgs),
    /// Delete the product at a listing position.
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the listing to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Listing format (text, json, html); inferred from the output path when omitted."
    )]
    pub output_format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(
        long = "name",
        value_name = "NAME",
        help_heading = "Fields",
        help = "Product name."
    )]
    pub name: String,

    #[arg(
        long = "category",
        value_name = "CATEGORY",
        help_heading = "Fields",
        help = "Product category."
    )]
    pub category: String,

    #[arg(
        long = "price",
        value_name = "PRICE",
        help_heading = "Fields",
        help = "Product price (e.g. 4.50)."
    )]
    pub price: String,

    #[arg(
        long = "desc",
        visible_alias = "description",
        value_name = "TEXT",
        default_value = "",
        help_heading = "Fields",
        help = "Product description."
    )]
    pub description: String,

    #[arg(
        long = "photo",
        value_name = "FILE",
        help_heading = "Fields",
        help = "Photo file to embed; a placeholder image is used when omitted."
    )]
    pub photo: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[arg(value_name = "POSITION", help = "Listing position of the record to edit.")]
    pub index: usize,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(
        long = "name",
        value_name = "NAME",
        help_heading = "Fields",
        help = "New product name; the current one is kept when omitted."
    )]
    pub name: Option<String>,

    #[arg(
        long = "category",
        value_name = "CATEGORY",
        help_heading = "Fields",
        help = "New product category; the current one is kept when omitted."
    )]
    pub category: Option<String>,

    #[arg(
        long = "price",
        value_name = "PRICE",
        help_heading = "Fields",
        help = "New product price; the current one is kept when omitted."
    )]
    pub price: Option<String>,

    #[arg(
        long = "desc",
        visible_alias = "description",
        value_name = "TEXT",
        help_heading = "Fields",
        help = "New product description; the current one is kept when omitted."
    )]
    pub description: Option<String>,

    #[arg(
        long = "photo",
        value_name = "FILE",
        help_heading = "Fields",
        help = "New photo file to embed; the current image is kept when omitted."
    )]
    pub photo: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(
        value_name = "POSITION",
        help = "Listing position of the record to delete."
    )]
    pub index: usize,
}
