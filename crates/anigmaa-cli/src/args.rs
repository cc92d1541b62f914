use std::path::PathBuf;

use anigmaa_core::config::{StoreKind, API_URL_ENV};
use anigmaa_core::models::{EventCategory, DEFAULT_NEARBY_RADIUS_M, DEFAULT_PAGE_LIMIT};
use clap::{Parser, Subcommand};

fn parse_store(s: &str) -> Result<StoreKind, String> {
    s.parse()
}

fn parse_category(s: &str) -> Result<EventCategory, String> {
    s.parse()
}

#[derive(Parser, Debug)]
#[command(name = "anigmaa", version, about = "Browse events, tickets and your feed on Anigmaa")]
pub struct Cli {
    /// API base URL, e.g. https://api.anigmaa.com/api/v1
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Where session tokens are kept: memory, file or keyring
    #[arg(long, global = true, value_parser = parse_store)]
    pub store: Option<StoreKind>,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, global = true, env = "ANIGMAA_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a Google ID token
    Login {
        /// Token from Google Sign-In; prompted for when omitted
        #[arg(long)]
        google_token: Option<String>,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Inspect or manage the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Find, inspect and join events
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },

    /// Show the home feed
    Feed {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
    },

    /// Like or unlike a post
    Like {
        post_id: String,
    },

    /// Buy, list and check in tickets
    Tickets {
        #[command(subcommand)]
        action: TicketsAction,
    },

    /// Host analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the saved configuration and its path
    Show,

    /// Update saved settings; omitted options are left as they are
    Set {
        /// API base URL
        #[arg(long = "url")]
        url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Default session store: memory, file or keyring
        #[arg(long = "session-store", value_parser = parse_store)]
        session_store: Option<StoreKind>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Show whether tokens are stored
    Status,
    /// Drop stored tokens without calling the server
    Clear,
    /// Exchange the refresh token for a new access token now
    Refresh,
}

#[derive(Subcommand, Debug)]
pub enum EventsAction {
    /// List events
    List {
        /// Text search over title and description
        #[arg(long)]
        query: Option<String>,

        #[arg(long, value_parser = parse_category)]
        category: Option<EventCategory>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
    },

    /// Events near a location
    #[command(allow_negative_numbers = true)]
    Nearby {
        lat: f64,
        lng: f64,

        /// Radius in meters
        #[arg(long, default_value_t = DEFAULT_NEARBY_RADIUS_M)]
        radius: u32,

        #[arg(long, value_parser = parse_category)]
        category: Option<EventCategory>,
    },

    /// Show an event with its attendees
    Show { event_id: String },

    Join { event_id: String },

    Leave { event_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TicketsAction {
    /// List your tickets
    List,

    /// Purchase tickets for an event
    Buy {
        event_id: String,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Check in a ticket at the door (host only)
    CheckIn { ticket_id: String },
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsAction {
    /// Revenue summary across hosted events
    Revenue,

    /// Sales and attendance for one event
    Event { event_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nearby_with_negative_latitude() {
        let cli = Cli::try_parse_from([
            "anigmaa", "events", "nearby", "-6.2", "106.8", "--category", "sports",
        ])
        .unwrap();

        match cli.command {
            Commands::Events {
                action:
                    EventsAction::Nearby {
                        lat,
                        lng,
                        radius,
                        category,
                    },
            } => {
                assert_eq!(lat, -6.2);
                assert_eq!(lng, 106.8);
                assert_eq!(radius, DEFAULT_NEARBY_RADIUS_M);
                assert_eq!(category, Some(EventCategory::Sports));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::try_parse_from(["anigmaa", "whoami", "--store", "memory"]).unwrap();
        assert_eq!(cli.store, Some(StoreKind::Memory));
        assert!(Cli::try_parse_from(["anigmaa", "whoami", "--store", "cloud"]).is_err());
    }

    #[test]
    fn test_config_set_parses_options() {
        let cli = Cli::try_parse_from([
            "anigmaa", "config", "set", "--timeout-secs", "30", "--session-store", "keyring",
        ])
        .unwrap();
        match cli.command {
            Commands::Config {
                action:
                    ConfigAction::Set {
                        url,
                        timeout_secs,
                        session_store,
                    },
            } => {
                assert_eq!(url, None);
                assert_eq!(timeout_secs, Some(30));
                assert_eq!(session_store, Some(StoreKind::Keyring));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ticket_quantity_defaults_to_one() {
        let cli = Cli::try_parse_from(["anigmaa", "tickets", "buy", "e1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tickets {
                action: TicketsAction::Buy { quantity: 1, .. }
            }
        ));
    }
}
