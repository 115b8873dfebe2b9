//! pointer: terminal front-end for the Pointer HR backend.
//!
//! Usage:
//!   pointer login [--email <email>]
//!   pointer whoami | menu | logout
//!   pointer users list [--setor TI] [--cargo ANALISTA] [--status ATIVO] [--page 2]
//!   pointer users show <email>
//!   pointer users create --nome "..." --email ... --setor ... --cargo ...
//!   pointer users update <email> [--nome ...] [--setor ... --cargo ...]
//!   pointer users toggle-status <email>
//!   pointer password recover [--email <email>]
//!   pointer profile show | password
//!   pointer open <path>
//!   pointer config show | set [--api-url ...] [--locale ...] [--page-size ...]

mod commands;
mod config;

use clap::{Parser, Subcommand};
use pointer_client::{UserFilters, UserStatus};
use pointer_hr::state::AppRoute;
use tracing_subscriber::EnvFilter;

use commands::users::UserInput;
use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "pointer", about = "Pointer HR command-line client")]
struct Cli {
    /// Path to config file (default: ~/.pointer/config.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Backend base URL; overrides the config file.
    #[arg(long, global = true, env = "POINTER_API_URL")]
    api_url: Option<String>,

    /// Output format: "text" (default) or "json".
    #[arg(short, long, global = true, default_value = "text")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and keep the session token.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Non-interactive password (for scripts).
        #[arg(long)]
        password: Option<String>,
    },
    /// Drop the stored session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Show the navigation menu for the signed-in user.
    Menu,
    /// Navigate to a path and print where the route guard lands.
    Open { path: String },
    /// Manage users (administrators).
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Forgotten-password recovery.
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Own profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Inspect or edit the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print version.
    Version,
}

#[derive(Subcommand, Debug)]
enum UsersAction {
    List {
        #[arg(long)]
        setor: Option<String>,
        #[arg(long)]
        cargo: Option<String>,
        #[arg(long, value_parser = ["ATIVO", "INATIVO"])]
        status: Option<String>,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        email: String,
    },
    Create {
        #[command(flatten)]
        fields: UserFields,
        #[arg(long)]
        email: String,
    },
    Update {
        email: String,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Flip ATIVO ↔ INATIVO.
    ToggleStatus {
        email: String,
    },
}

#[derive(clap::Args, Debug)]
struct UserFields {
    #[arg(long)]
    nome: Option<String>,
    #[arg(long)]
    setor: Option<String>,
    #[arg(long)]
    cargo: Option<String>,
    #[arg(long = "tipo", value_parser = ["ADMIN", "GESTOR", "COLABORADOR"])]
    tipo_usuario: Option<String>,
    #[arg(long, value_parser = ["ATIVO", "INATIVO"])]
    status: Option<String>,
}

impl UserFields {
    fn into_input(self, email: Option<String>) -> UserInput {
        UserInput {
            nome: self.nome,
            email,
            setor: self.setor,
            cargo: self.cargo,
            tipo_usuario: self.tipo_usuario,
            status: self.status,
        }
    }
}

#[derive(Subcommand, Debug)]
enum PasswordAction {
    /// Request a code, verify it, and set a new password.
    Recover {
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    Show,
    /// Change your password.
    Password,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        token_file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.output == "json";

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(CliConfig::default_path);
    let config = CliConfig::load(&config_path)?.with_api_url(cli.api_url);

    match cli.command {
        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => commands::prompt("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            let app = commands::open(&config)?;
            let (identity, landing) = commands::session::login(&app, &email, &password).await?;
            if json {
                commands::print_json(&identity)?;
            } else {
                println!("Logged in as {} <{}>.", identity.display_name, identity.email);
                println!("Home: {}", landing);
            }
        }

        Commands::Logout => {
            commands::session::logout(&commands::open(&config)?).await?;
            println!("Logged out.");
        }

        Commands::Whoami => {
            let app = commands::open(&config)?;
            let shell = commands::session::whoami(&app).await?;
            let identity = commands::signed_in(&app)?;
            if json {
                commands::print_json(&identity)?;
            } else {
                println!("{}", commands::session::render_whoami(&shell, &identity));
            }
        }

        Commands::Menu => {
            let app = commands::open(&config)?;
            let shell = commands::session::whoami(&app).await?;
            if json {
                commands::print_json(&shell.menu)?;
            } else {
                println!("{}", commands::session::render_menu(&shell));
            }
        }

        Commands::Open { path } => {
            let app = commands::open(&config)?;
            // Signed-out users are still routed; the guard sends them to /login.
            let _ = commands::restore(&app).await;
            app.emit(
                pointer_hr::request::NavigateReq::PATH,
                pointer_hr::request::NavigateReq { path },
            )
            .await;
            let landed = app.read::<AppRoute>(AppRoute::PATH).map(|r| r.0).unwrap_or_default();
            println!("{landed}");
        }

        Commands::Users { action } => {
            let app = commands::open(&config)?;
            match action {
                UsersAction::List { setor, cargo, status, page } => {
                    let filters = UserFilters {
                        setor,
                        cargo,
                        status: status.as_deref().and_then(UserStatus::parse),
                    };
                    let state = commands::users::list(&app, filters, page).await?;
                    if json {
                        commands::print_json(&state.rows)?;
                    } else {
                        println!("{}", commands::users::render_list(&state));
                    }
                }
                UsersAction::Show { email } => {
                    let user = commands::users::show(&app, &email).await?;
                    if json {
                        commands::print_json(&user)?;
                    } else {
                        println!("{}", commands::users::render_user(&user));
                    }
                }
                UsersAction::Create { fields, email } => {
                    let message = commands::users::create(&app, fields.into_input(Some(email))).await?;
                    println!("{message}");
                }
                UsersAction::Update { email, fields } => {
                    let message = commands::users::update(&app, &email, fields.into_input(None)).await?;
                    println!("{message}");
                }
                UsersAction::ToggleStatus { email } => {
                    let message = commands::users::toggle_status(&app, &email).await?;
                    println!("{message}");
                }
            }
        }

        Commands::Password { action } => match action {
            PasswordAction::Recover { email } => {
                let app = commands::open(&config)?;
                let notice =
                    commands::recovery::run(&app, email, &mut commands::recovery::Terminal).await?;
                println!("{notice}");
            }
        },

        Commands::Profile { action } => {
            let app = commands::open(&config)?;
            match action {
                ProfileAction::Show => {
                    let user = commands::profile::show(&app).await?;
                    if json {
                        commands::print_json(&user)?;
                    } else {
                        println!("{}", commands::users::render_user(&user));
                    }
                }
                ProfileAction::Password => {
                    let (password, confirmation) = commands::prompt_new_password()?;
                    let message =
                        commands::profile::change_password(&app, password, confirmation).await?;
                    println!("{message}");
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Set { api_url, locale, page_size, token_file } => {
                // Start from the file, not the env-overridden view.
                let mut stored = CliConfig::load(&config_path)?;
                if let Some(url) = api_url {
                    stored.hr.api_url = url;
                }
                if let Some(locale) = locale {
                    stored.hr.locale = locale;
                }
                if let Some(size) = page_size {
                    stored.hr.page_size = size;
                }
                if let Some(path) = token_file {
                    stored.token_file = Some(path.into());
                }
                stored.save(&config_path)?;
                println!("Saved {}.", config_path.display());
            }
        },

        Commands::Version => {
            println!("pointer cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
