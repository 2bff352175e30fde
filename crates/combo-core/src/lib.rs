pub mod collab;
pub mod combobox;
pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod pointer;

#[cfg(test)]
pub(crate) mod testing;

pub use collab::{DropdownToggle, Focusable, ListView, PillInput};
pub use combobox::ComboBox;
pub use config::{ComboConfig, ComboOptions};
pub use error::{ComboError, Result};
pub use event::{
    ComboEvent, FocusRegion, HostState, Key, KeyInput, PillInputEvent, Propagation, SelectEvent,
    SubmitEvent, SubmitRequest,
};
pub use item::{Item, ItemId, Mode, Size};
pub use pointer::{Document, PointerEvent, PointerSubscription, Region};
