use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use folio::config::{ConfigError, GoTrueConfig};
use folio::gotrue::GoTrueProvider;
use folio::routes::{self, Navigation, ROUTES};
use folio::{AuthError, AuthErrorKind, AuthGateway, AuthState, ProviderError, SessionStore, SignupRequest};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("identity provider unavailable: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Portfolio auth gateway and route guard driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route table with each route's access rule.
    Routes,
    /// Bootstrap a session, optionally sign in, then resolve a path.
    Visit(VisitArgs),
    /// Create an account.
    Signup(SignupArgs),
}

#[derive(Args, Debug)]
struct VisitArgs {
    /// Path to navigate to, e.g. `/admin`.
    path: String,

    #[arg(long, requires = "password")]
    email: Option<String>,

    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Sign out again before exiting.
    #[arg(long)]
    logout: bool,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    profession: Option<String>,

    #[arg(long)]
    bio: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env file could not be loaded");
        }
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Routes => {
            print_routes();
            Ok(())
        }
        Command::Visit(args) => run_visit(args).await,
        Command::Signup(args) => run_signup(args).await,
    }
}

fn connect() -> Result<AuthGateway, CliError> {
    let config = GoTrueConfig::from_env()?;
    tracing::debug!(?config, "identity provider configured");
    let provider = GoTrueProvider::new(config)?;
    Ok(AuthGateway::new(Arc::new(provider), SessionStore::new()))
}

fn print_routes() {
    for route in ROUTES {
        println!("{:<14} {}", route.path, route.access_label());
    }
}

async fn run_visit(args: VisitArgs) -> Result<(), CliError> {
    let gateway = connect()?;
    gateway.bootstrap().await;

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        gateway.login(email, password).await?;
    }

    let state = gateway.store().get();
    print_visit(&args.path, &state);

    if args.logout {
        gateway.logout().await;
        let after = gateway.store().get();
        println!("after logout:");
        print_visit(&args.path, &after);
    }

    gateway.shutdown();
    Ok(())
}

fn print_visit(path: &str, state: &AuthState) {
    match &state.session {
        Some(session) => println!("signed in as {} ({:?})", session.display_name(), session.role),
        None => println!("signed out"),
    }

    let first = routes::resolve(path, state);
    let (last, at) = routes::resolve_final(path, state);
    match (first, last) {
        (Navigation::Redirect(to), Navigation::Render(page)) => {
            println!("{path} -> redirect {to} -> {at} renders {}", page.title());
        }
        (_, Navigation::Render(page)) => println!("{path} renders {}", page.title()),
        (_, Navigation::Pending) => println!("{path} is pending"),
        (_, Navigation::Redirect(to)) => println!("{path} -> redirect {to} (too many hops)"),
    }

    if state.is_authenticated() {
        let links: Vec<&str> = routes::nav_links(state).iter().map(|l| l.label).collect();
        println!("nav: {}", links.join(" | "));
    }
}

async fn run_signup(args: SignupArgs) -> Result<(), CliError> {
    let gateway = connect()?;
    gateway.bootstrap().await;

    let request = SignupRequest {
        name: args.name,
        email: args.email,
        password: args.password,
        profession: args.profession,
        bio: args.bio,
    };
    let result = gateway.signup(&request).await;
    gateway.shutdown();

    match result {
        Ok(()) => {
            println!("account created; signed in");
            Ok(())
        }
        Err(e) if e.kind() == AuthErrorKind::PendingConfirmation => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
