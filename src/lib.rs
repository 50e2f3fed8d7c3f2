//! CliniPick - searchable selects and paginated lists for clinic records
//!
//! One generic control picks a client, an order or a resource from a remote
//! collaborator while the user types, and one pagination controller drives
//! every list page.
//!
//! # Features
//!
//! - **Debounced search**: queries settle only after typing pauses
//! - **Length gate**: short queries never reach the collaborator
//! - **Last request wins**: late responses for old queries are dropped
//! - **Stable selection**: the committed label survives list changes
//! - **Unified pagination**: the same rules for in-memory and server-paged lists
//!
//! # Example
//!
//! ```no_run
//! use clinipick::{ClinicData, Client, PickerConfig, SearchSelect, Session};
//! use std::time::{Duration, Instant};
//!
//! fn main() -> clinipick::Result<()> {
//!     let dirs = ClinicData::sample().directories(Duration::ZERO);
//!     let session = Session::new("Downtown");
//!
//!     let mut picker: SearchSelect<Client> =
//!         SearchSelect::new(&session, dirs.clients.clone(), &PickerConfig::default());
//!     picker.on_select(|state| println!("picked {:?}", state.selected_label));
//!
//!     picker.open();
//!     let now = Instant::now();
//!     picker.input("john", now);
//!     picker.tick(now + Duration::from_millis(300));
//!     picker.wait_for_results(Duration::from_secs(1));
//!
//!     for option in picker.options() {
//!         println!("{} - {}", option.label, option.subtitle);
//!     }
//!     picker.select(0);
//!     Ok(())
//! }
//! ```

pub mod collaborator;
pub mod config;
pub mod data;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod list_view;
pub mod logging;
pub mod options;
pub mod pagination;
pub mod picker;
pub mod records;
pub mod selection;
pub mod session;
pub mod tui;

// Re-export main types
pub use collaborator::{Collaborator, Directory, FetchRequest, FetchResponse, PageInfo};
pub use config::{AppConfig, PickerConfig};
pub use data::{ClinicData, ClinicRecords, Directories};
pub use debounce::{Debouncer, SearchQuery};
pub use error::{CliniPickError, Result};
pub use fetcher::{FetchState, RemoteFetcher};
pub use list_view::ListView;
pub use options::{OptionDescriptor, OptionMapper, OptionView};
pub use pagination::{PageMode, PageState, Paginator};
pub use picker::{PickerStatus, SearchSelect};
pub use records::{Client, Order, OrderStatus, PickRecord, RecordId, Resource};
pub use selection::{SelectionController, SelectionState};
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
