//! Command handlers. Each prints its result as pretty JSON on stdout.

use std::sync::Arc;

use anigmaa_core::auth::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore,
};
use anigmaa_core::config::{Config, StoreKind};
use anigmaa_core::models::{EventSearchParams, NearbyEventsParams, PageParams};
use anigmaa_core::ApiClient;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::args::{
    AnalyticsAction, Cli, Commands, ConfigAction, EventsAction, SessionAction, TicketsAction,
};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Everything a command needs: the client plus where its tokens live
struct RunContext {
    client: ApiClient,
    config: Config,
    store_kind: StoreKind,
}

impl RunContext {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable config file");
            Config::default()
        });

        let mut client_config = config.client_config();
        if let Some(url) = &cli.api_url {
            client_config.base_url = url.clone();
        }

        let store_kind = cli.store.unwrap_or_else(|| config.store_kind());
        let store: Arc<dyn SessionStore> = match store_kind {
            StoreKind::Memory => Arc::new(MemorySessionStore::new()),
            StoreKind::File => Arc::new(FileSessionStore::new(config.cache_dir()?)),
            StoreKind::Keyring => Arc::new(KeyringSessionStore::new()?),
        };
        debug!(base_url = %client_config.base_url, ?store_kind, "Client configured");

        let client = ApiClient::with_store(&client_config, store)
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            config,
            store_kind,
        })
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    // Editing the config must not need a working client
    if let Commands::Config { action } = cli.command {
        return config(action);
    }

    let ctx = RunContext::from_cli(&cli)?;
    let client = &ctx.client;

    match cli.command {
        Commands::Login { google_token } => {
            let token = match google_token {
                Some(token) => token,
                None => rpassword::prompt_password("Google ID token: ")
                    .context("Failed to read token")?,
            };
            let tokens = client.auth().login_with_google(token.trim()).await?;
            print_json(&json!({
                "signed_in": true,
                "user": tokens.user,
                "expires_in": tokens.expires_in,
            }))
        }
        Commands::Logout => {
            client.auth().logout().await?;
            print_json(&json!({ "signed_in": false }))
        }
        Commands::Whoami => print_json(&client.users().me().await?),
        Commands::Session { action } => session(&ctx, action).await,
        Commands::Events { action } => events(client, action).await,
        Commands::Feed { page, limit } => {
            let feed = client.posts().feed(PageParams::new(page, limit)).await?;
            print_json(&feed)
        }
        Commands::Like { post_id } => {
            let mut post = client.posts().get(&post_id).await?;
            client.posts().toggle_like(&mut post).await?;
            print_json(&json!({
                "post_id": post.id,
                "liked": post.liked(),
                "likes_count": post.likes_count,
            }))
        }
        Commands::Tickets { action } => match action {
            TicketsAction::List => print_json(&client.tickets().my_tickets().await?),
            TicketsAction::Buy { event_id, quantity } => {
                print_json(&client.tickets().purchase(&event_id, quantity).await?)
            }
            TicketsAction::CheckIn { ticket_id } => {
                print_json(&client.tickets().check_in(&ticket_id).await?)
            }
        },
        Commands::Analytics { action } => match action {
            AnalyticsAction::Revenue => print_json(&client.analytics().host_revenue().await?),
            AnalyticsAction::Event { event_id } => {
                print_json(&client.analytics().event(&event_id).await?)
            }
        },
        Commands::Config { action } => config(action),
    }
}

fn config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;
    if let ConfigAction::Set {
        url,
        timeout_secs,
        session_store,
    } = action
    {
        if let Some(url) = url {
            config.api_url = Some(url);
        }
        if let Some(secs) = timeout_secs {
            anyhow::ensure!(secs > 0, "timeout must be at least one second");
            config.timeout_secs = Some(secs);
        }
        if let Some(kind) = session_store {
            config.session_store = Some(kind);
        }
        config.save()?;
    }
    print_json(&json!({
        "path": Config::config_path()?,
        "config": config,
    }))
}

async fn session(ctx: &RunContext, action: SessionAction) -> Result<()> {
    let client = &ctx.client;
    match action {
        SessionAction::Status => {
            let creds = client.session().credentials()?;
            let saved_minutes_ago = match ctx.store_kind {
                StoreKind::File => FileSessionStore::new(ctx.config.cache_dir()?)
                    .load()?
                    .map(|data| data.minutes_since_saved()),
                _ => None,
            };
            print_json(&json!({
                "store": ctx.store_kind,
                "api_url": client.base_url(),
                "signed_in": creds.access_token.is_some(),
                "can_refresh": creds.can_refresh(),
                "saved_minutes_ago": saved_minutes_ago,
            }))
        }
        SessionAction::Clear => {
            client.session().clear().await?;
            print_json(&json!({ "signed_in": false }))
        }
        SessionAction::Refresh => {
            let tokens = client.auth().refresh_token().await?;
            print_json(&json!({
                "refreshed": true,
                "expires_in": tokens.expires_in,
            }))
        }
    }
}

async fn events(client: &ApiClient, action: EventsAction) -> Result<()> {
    match action {
        EventsAction::List {
            query,
            category,
            page,
            limit,
        } => {
            let params = EventSearchParams {
                query,
                category,
                page: Some(page),
                limit: Some(limit),
                ..Default::default()
            };
            print_json(&client.events().list(&params).await?)
        }
        EventsAction::Nearby {
            lat,
            lng,
            radius,
            category,
        } => {
            let mut params = NearbyEventsParams::new(lat, lng).radius(radius);
            if let Some(category) = category {
                params = params.category(category);
            }
            print_json(&client.events().nearby(params).await?)
        }
        EventsAction::Show { event_id } => {
            let events = client.events();
            let (event, attendees) = futures::try_join!(
                events.get(&event_id),
                events.attendees(&event_id),
            )?;
            print_json(&json!({ "event": event, "attendees": attendees }))
        }
        EventsAction::Join { event_id } => {
            client.events().join(&event_id).await?;
            print_json(&json!({ "event_id": event_id, "joined": true }))
        }
        EventsAction::Leave { event_id } => {
            client.events().leave(&event_id).await?;
            print_json(&json!({ "event_id": event_id, "joined": false }))
        }
    }
}
