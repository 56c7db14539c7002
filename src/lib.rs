//! jsonpick - fetch a JSON document and pick fields out of it
//!
//! ```no_run
//! use jsonpick::{Picker, PickOptions, Selector};
//!
//! # async fn run() -> Result<(), jsonpick::PickError> {
//! let picker = Picker::new()?;
//! let selectors = vec![
//!     Selector::new("balances[0].balance").key("usd_balance"),
//!     Selector::new("balances[*].balance").key("all_balances"),
//!     Selector::new("memo").default(serde_json::Value::Null),
//! ];
//! let url = "https://horizon-testnet.stellar.org/accounts/G...";
//! let picked = picker.pick(url, &selectors, &PickOptions::default()).await?;
//! println!("{:#}", picked.to_json());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetch;
pub mod jsonpath;
pub mod numberify;
pub mod picker;
pub mod selector;
pub mod spec;
pub mod transform;
pub mod util;

pub use error::{FixSuggestion, PickError};
pub use fetch::{FetchRequest, HttpTransport, Transport};
pub use jsonpath::{resolve, tokenize, Step};
pub use numberify::numberify;
pub use picker::{fetch_json_pick, PickOptions, Picker};
pub use selector::{evaluate, parse_selector, EvalOptions, Picked, Selector};
pub use spec::PickSpec;
pub use transform::{Builtin, Transform};
