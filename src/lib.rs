//! # blaseball - an async client for the Blaseball web API
//!
//! Log in once, then read users, teams and players as typed objects. Every
//! request goes through a cookie-backed [`Session`] that retries failures with
//! exponential backoff (5 attempts by default) and logs through `tracing`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use blaseball::Blaseball;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blaseball::Error> {
//!     blaseball::logging::init("blaseball=info")?;
//!
//!     let client = Blaseball::login("foo", "bar").await?;
//!
//!     let user = client.user().await?;
//!     println!("{} has {} coins and {} peanuts", user.email, user.coins, user.peanuts);
//!
//!     for team in client.teams().await? {
//!         println!("{} {}", team.emoji, team.full_name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lazy references
//!
//! Entities only hold the ids of the things they point at. Accessors such as
//! [`User::favorite_team`] and [`Team::lineup`] fetch on every call and never
//! cache, so two calls may see different data if the game moved on in between.
//!
//! ## Configuration
//!
//! ```no_run
//! use blaseball::{retry::RetryOn5xx, Blaseball, RetryStrategy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), blaseball::Error> {
//! let client = Blaseball::builder()
//!     .base_url("https://blaseball.example.org/")?
//!     .timeout(Duration::from_secs(10))
//!     .retry_strategy(RetryStrategy::Linear {
//!         delay: Duration::from_millis(500),
//!         max_retries: 2,
//!     })
//!     .retry_predicate(Box::new(RetryOn5xx))
//!     .login("foo", "bar")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use blaseball::{Blaseball, Error};
//!
//! # async fn example(client: Blaseball) {
//! match client.user().await {
//!     Ok(user) => println!("Hello {}", user.email),
//!     Err(Error::HttpError { status, method, url, .. }) => {
//!         eprintln!("{} {} failed with {}", method, url, status);
//!     }
//!     Err(Error::Decoding { entity, message }) => {
//!         eprintln!("Unexpected {} payload: {}", entity, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # }
//! ```

pub mod api;
mod client;
mod error;
pub mod logging;
pub mod metadata;
pub mod models;
mod response;
pub mod retry;
mod session;

pub use client::Blaseball;
pub use error::{Error, Result};
pub use models::{Entity, Player, Team, User};
pub use response::Response;
pub use retry::{RetryPredicate, RetryStrategy};
pub use session::{ClientBuilder, Session, DEFAULT_BASE_URL};
