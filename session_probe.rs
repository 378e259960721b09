// Rollcall session probe
// Restores the cached session, optionally runs one auth command against the
// configured identity API, and prints where the app would land.
//
//   session_probe                         # show restored session
//   session_probe login <email> <password>
//   session_probe signup <name> <email> <password>
//   session_probe logout
//
// ROLLCALL_CONFIG points at an optional TOML file; ROLLCALL_* variables
// override it. ROLLCALL_PROBE_OFFLINE=1 swaps the HTTP API for an in-memory
// one seeded with demo accounts.

use std::sync::Arc;

use rollcall::client::{
    capabilities, route, Config, CredentialVerifier, FileSessionCache, InMemoryIdentityBackend,
    NoSessionCache, SessionCache, SessionStore,
};
use rollcall::shared::{Identity, Role, Session};

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    match std::env::var("ROLLCALL_CONFIG") {
        Ok(path) => Ok(Config::from_file(path)?),
        Err(_) => Ok(Config::from_env()?),
    }
}

fn offline_store(config: &Config) -> SessionStore {
    let backend = InMemoryIdentityBackend::new()
        .with_account(Identity::new("demo-teacher", "Demo Teacher", "teacher@demo.school", Role::Teacher), "demo")
        .with_account(Identity::new("demo-student", "Demo Student", "student@demo.school", Role::Student), "demo")
        .with_account(Identity::new("demo-admin", "Demo Admin", "admin@demo.school", Role::Admin), "demo");
    let cache: Arc<dyn SessionCache> = match config.session_file() {
        Some(path) => Arc::new(FileSessionCache::new(path)),
        None => Arc::new(NoSessionCache),
    };
    SessionStore::new(CredentialVerifier::new(Arc::new(backend)), cache)
        .with_policy(config.mutation_policy())
}

fn describe(session: &Session) {
    match session {
        Session::Unresolved => println!("Session:     unresolved"),
        Session::Anonymous => println!("Session:     signed out"),
        Session::Authenticated(identity) => {
            println!("Session:     {} <{}> ({})", identity.name(), identity.email(), identity.role());
        }
    }
    println!("Destination: {:?}", route(session));
    println!("Can:         {:?}", capabilities(session));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = load_config()?;
    let offline = std::env::var("ROLLCALL_PROBE_OFFLINE").unwrap_or_default() == "1";

    println!("Identity API: {}", if offline { "in-memory (offline)" } else { config.server_url() });
    if let Some(path) = config.session_file() {
        println!("Session file: {}", path.display());
    }

    let store = if offline {
        offline_store(&config)
    } else {
        SessionStore::from_config(&config)?
    };
    store.init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let outcome = match args.as_slice() {
        [] => Ok(()),
        ["login", email, password] => store.login(email, password).await.map(|_| ()),
        ["signup", name, email, password] => store.signup(name, email, password).await.map(|_| ()),
        ["logout"] => {
            store.logout();
            Ok(())
        }
        _ => {
            eprintln!("usage: session_probe [login <email> <password> | signup <name> <email> <password> | logout]");
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        println!("Failed:      {}", e.user_message());
        tracing::debug!("Probe failure detail: {}", e);
    }

    describe(&store.current());
    store.teardown();
    Ok(())
}
