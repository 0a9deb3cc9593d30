use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::get_styles;
use phone_catalog::catalog_store::{
    price_from_json, Brand, BrandPatch, NewBrand, NewPhoneModel, PageRequest, PhoneModelPatch,
};
use phone_catalog::config::{
    AppConfig, CliConfig, FileConfig, LatencyMode, DEFAULT_SESSION_FILE,
    DEFAULT_TOAST_DURATION_MS,
};
use phone_catalog::{
    ApiResponse, CatalogResult, CatalogStore, FileSessionStore, Fixtures, NotificationChannel,
    SessionGate, ToastType,
};

use rustyline::{
    completion::Completer,
    highlight::Highlighter,
    history::FileHistory,
    validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding brands.json and models.json. The built-in
    /// fixtures are used when omitted.
    #[clap(long, value_parser = parse_path)]
    pub fixtures_dir: Option<PathBuf>,

    #[clap(long, value_enum, default_value_t = LatencyMode::None)]
    pub latency: LatencyMode,

    /// Delay applied to every operation when --latency=fixed.
    #[clap(long, default_value_t = 0)]
    pub latency_ms: u64,

    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    #[clap(long)]
    pub admin_username: Option<String>,

    #[clap(long)]
    pub admin_password: Option<String>,

    #[clap(long, default_value_t = DEFAULT_TOAST_DURATION_MS)]
    pub toast_duration_ms: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            fixtures_dir: self.fixtures_dir.clone(),
            latency: self.latency,
            latency_ms: self.latency_ms,
            session_file: self.session_file.clone(),
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.clone(),
            toast_duration_ms: self.toast_duration_ms,
        }
    }
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BrandField {
    Logo,
    Country,
    Description,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelField {
    Price,
    ReleaseDate,
    Image,
    Specs,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Lists all brands.
    Brands,

    /// Shows a single brand.
    Brand { id: i64 },

    /// Creates a brand. Requires login.
    AddBrand {
        name: String,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Updates the given fields of a brand. Requires login.
    EditBrand {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Sets a field to null, can be repeated.
        #[arg(long, value_enum)]
        clear: Vec<BrandField>,
    },

    /// Deletes a brand without models. Requires login.
    RmBrand { id: i64 },

    /// Lists phone models one page at a time.
    Models {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Shows a single phone model.
    Model { id: i64 },

    /// Creates a phone model. Requires login.
    AddModel {
        brand_id: i64,
        name: String,
        /// Defaults to the name of the brand with `brand_id`.
        #[arg(long)]
        brand_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Free-form JSON object.
        #[arg(long)]
        specs: Option<String>,
    },

    /// Updates the given fields of a phone model. Requires login.
    EditModel {
        id: i64,
        #[arg(long)]
        brand_id: Option<i64>,
        #[arg(long)]
        brand_name: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        specs: Option<String>,
        /// Sets a field to null, can be repeated.
        #[arg(long, value_enum)]
        clear: Vec<ModelField>,
    },

    /// Deletes a phone model. Requires login.
    RmModel { id: i64 },

    /// Case-insensitive search over model name, brand and description.
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// Lists the models of a brand.
    ByBrand { brand_id: i64 },

    /// Shows catalog statistics.
    Stats,

    /// Restores the catalog to the loaded fixtures. Requires login.
    Reset,

    /// Logs in as the administrator.
    Login { username: String, password: String },

    /// Ends the current session.
    Logout,

    /// Shows the logged in user.
    Whoami,

    /// Close this program.
    Exit,
}

impl InnerCommand {
    fn requires_login(&self) -> bool {
        matches!(
            self,
            InnerCommand::AddBrand { .. }
                | InnerCommand::EditBrand { .. }
                | InnerCommand::RmBrand { .. }
                | InnerCommand::AddModel { .. }
                | InnerCommand::EditModel { .. }
                | InnerCommand::RmModel { .. }
                | InnerCommand::Reset
        )
    }
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

fn parse_price(raw: &str) -> std::result::Result<f64, String> {
    price_from_json(&serde_json::Value::String(raw.to_string()))
        .ok_or_else(|| format!("Invalid price: {}", raw))
}

fn parse_specs(raw: &str) -> std::result::Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("Invalid specs JSON: {}", err))
}

struct Shell {
    runtime: tokio::runtime::Runtime,
    store: CatalogStore,
    gate: SessionGate,
    toasts: NotificationChannel,
}

impl Shell {
    fn print_envelope<T: Serialize>(response: &ApiResponse<T>) {
        match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{}", json),
            Err(err) => cli_style::print_error(&format!("Could not render response: {}", err)),
        }
    }

    /// Prints the envelope and raises a toast for it. Reads only toast on
    /// failure.
    fn report<T: Serialize>(&self, result: CatalogResult<T>, toast_on_success: bool) {
        let response = ApiResponse::from(result);
        Self::print_envelope(&response);
        if !response.success {
            self.toasts.error(response.message);
        } else if toast_on_success {
            self.toasts.success(response.message);
        }
    }

    fn show_toast(&self) {
        let toast = self.toasts.current();
        if !toast.show {
            return;
        }
        match toast.toast_type {
            ToastType::Success => cli_style::print_success(&toast.message),
            ToastType::Error => cli_style::print_error(&toast.message),
            ToastType::Warning => cli_style::print_warning(&toast.message),
            ToastType::Info => cli_style::print_info(&toast.message),
        }
        self.toasts.dismiss();
    }

    fn brand_name_of(&self, brand_id: i64) -> Option<String> {
        brand_name_in(&self.store.current_brands(), brand_id)
    }

    fn execute_command(&self, line: String) -> CommandExecutionResult {
        if line.is_empty() {
            return CommandExecutionResult::Ok;
        }

        let args = shlex::split(&line)
            .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

        let cli =
            InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

        let command = match cli {
            Ok(cli) => cli.command,
            Err(e) => {
                if e.print().is_err() {
                    println!("{}", e);
                }
                return CommandExecutionResult::Ok;
            }
        };

        cli_style::print_command_echo(&line);

        if command.requires_login() && !self.gate.is_authenticated() {
            self.toasts.error("Login required");
            self.show_toast();
            return CommandExecutionResult::Ok;
        }

        let rt = &self.runtime;
        match command {
            InnerCommand::Brands => self.report(rt.block_on(self.store.fetch_brands()), false),
            InnerCommand::Brand { id } => self.report(rt.block_on(self.store.fetch_brand(id)), false),
            InnerCommand::AddBrand {
                name,
                logo,
                country,
                description,
            } => {
                let new_brand = NewBrand {
                    name,
                    logo,
                    country,
                    description,
                    extra: Default::default(),
                };
                self.report(rt.block_on(self.store.create_brand(new_brand)), true);
            }
            InnerCommand::EditBrand {
                id,
                name,
                logo,
                country,
                description,
                clear,
            } => {
                let mut patch = BrandPatch {
                    name,
                    logo: logo.map(Some),
                    country: country.map(Some),
                    description: description.map(Some),
                    extra: Default::default(),
                };
                for field in clear {
                    match field {
                        BrandField::Logo => patch.logo = Some(None),
                        BrandField::Country => patch.country = Some(None),
                        BrandField::Description => patch.description = Some(None),
                    }
                }
                self.report(rt.block_on(self.store.update_brand(id, patch)), true);
            }
            InnerCommand::RmBrand { id } => {
                self.report(rt.block_on(self.store.delete_brand(id)), true)
            }
            InnerCommand::Models { page, limit } => {
                let request = PageRequest::new(page, limit);
                self.report(rt.block_on(self.store.fetch_phone_models(request)), false);
            }
            InnerCommand::Model { id } => {
                self.report(rt.block_on(self.store.fetch_phone_model(id)), false)
            }
            InnerCommand::AddModel {
                brand_id,
                name,
                brand_name,
                description,
                price,
                release_date,
                image,
                specs,
            } => {
                let price = match price.as_deref().map(parse_price).transpose() {
                    Ok(price) => price,
                    Err(err) => return CommandExecutionResult::Error(err),
                };
                let specs = match specs.as_deref().map(parse_specs).transpose() {
                    Ok(specs) => specs,
                    Err(err) => return CommandExecutionResult::Error(err),
                };
                let new_model = NewPhoneModel {
                    brand_id,
                    brand_name: brand_name
                        .or_else(|| self.brand_name_of(brand_id))
                        .unwrap_or_default(),
                    name,
                    description: description.unwrap_or_default(),
                    price,
                    release_date,
                    image,
                    specs,
                    extra: Default::default(),
                };
                self.report(rt.block_on(self.store.create_phone_model(new_model)), true);
            }
            InnerCommand::EditModel {
                id,
                brand_id,
                brand_name,
                name,
                description,
                price,
                release_date,
                image,
                specs,
                clear,
            } => {
                let price = match price.as_deref().map(parse_price).transpose() {
                    Ok(price) => price,
                    Err(err) => return CommandExecutionResult::Error(err),
                };
                let specs = match specs.as_deref().map(parse_specs).transpose() {
                    Ok(specs) => specs,
                    Err(err) => return CommandExecutionResult::Error(err),
                };
                let brand_name = moved_brand_name(
                    &self.store.current_brands(),
                    brand_id,
                    brand_name,
                );
                let mut patch = PhoneModelPatch {
                    brand_id,
                    brand_name,
                    name,
                    description,
                    price: price.map(Some),
                    release_date: release_date.map(Some),
                    image: image.map(Some),
                    specs: specs.map(Some),
                    extra: Default::default(),
                };
                for field in clear {
                    match field {
                        ModelField::Price => patch.price = Some(None),
                        ModelField::ReleaseDate => patch.release_date = Some(None),
                        ModelField::Image => patch.image = Some(None),
                        ModelField::Specs => patch.specs = Some(None),
                    }
                }
                self.report(rt.block_on(self.store.update_phone_model(id, patch)), true);
            }
            InnerCommand::RmModel { id } => {
                self.report(rt.block_on(self.store.delete_phone_model(id)), true)
            }
            InnerCommand::Search { query } => {
                self.report(rt.block_on(self.store.search_phones(&query)), false)
            }
            InnerCommand::ByBrand { brand_id } => {
                self.report(rt.block_on(self.store.fetch_phones_by_brand(brand_id)), false)
            }
            InnerCommand::Stats => self.report(rt.block_on(self.store.get_stats()), false),
            InnerCommand::Reset => self.report(rt.block_on(self.store.reset_data()), true),
            InnerCommand::Login { username, password } => {
                let outcome = rt.block_on(self.gate.login(&username, &password));
                match serde_json::to_string_pretty(&outcome) {
                    Ok(json) => println!("{}", json),
                    Err(err) => return CommandExecutionResult::Error(err.to_string()),
                }
                if outcome.success {
                    self.toasts.success(outcome.message);
                } else {
                    self.toasts.error(outcome.message);
                }
            }
            InnerCommand::Logout => {
                if self.gate.is_authenticated() {
                    self.gate.logout();
                    self.toasts.info("Logged out");
                } else {
                    self.toasts.warning("Not logged in");
                }
            }
            InnerCommand::Whoami => match self.gate.current_user() {
                Some(user) => {
                    cli_style::print_section_header("Session");
                    cli_style::print_key_value("Username", &user.username);
                    cli_style::print_key_value("Name", &user.name);
                    cli_style::print_key_value("Role", &user.role);
                    cli_style::print_section_footer();
                }
                None => self.toasts.info("Not logged in"),
            },
            InnerCommand::Exit => return CommandExecutionResult::Exit,
        }
        self.show_toast();
        CommandExecutionResult::Ok
    }
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn brand_name_in(brands: &[Brand], brand_id: i64) -> Option<String> {
    brands.iter().find(|b| b.id == brand_id).map(|b| b.name.clone())
}

/// `brand_name` to send when editing a model. Moving to a known brand also
/// renames the model unless a name was given. An unknown target keeps the
/// current name.
fn moved_brand_name(
    brands: &[Brand],
    brand_id: Option<i64>,
    brand_name: Option<String>,
) -> Option<String> {
    brand_name.or_else(|| brand_id.and_then(|id| brand_name_in(brands, id)))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let cli_args = CliArgs::parse();
    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let (fixtures, fixtures_source) = match &config.fixtures_dir {
        Some(dir) => (Fixtures::load_dir(dir)?, dir.display().to_string()),
        None => (
            Fixtures::builtin().context("Failed to parse built-in fixtures")?,
            "built-in".to_string(),
        ),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let store = CatalogStore::new(fixtures).with_latency(config.latency);
    let session_store = FileSessionStore::initialize(config.session_file.clone());
    let gate = SessionGate::new(config.credentials.clone(), Box::new(session_store))
        .with_latency(config.latency);
    gate.check_auth_status();

    let shell = Shell {
        runtime,
        store,
        gate,
        toasts: NotificationChannel::new(config.toast_duration),
    };

    cli_style::print_welcome(
        &fixtures_source,
        &config.session_file.display().to_string(),
        &format!("{:?}", config.latency),
    );

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;

    let helper = MyHelper::new();
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(&cli_style::get_prompt(shell.gate.is_authenticated()));

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match shell.execute_command(line) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    cli_style::print_goodbye();
    Ok(())
}
