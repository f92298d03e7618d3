mod command_palette;
mod employee_picker;
mod key_result;

pub use command_palette::{CommandEvent, CommandPalette};
pub use employee_picker::{EmployeePicker, PickerEvent};
pub use key_result::KeyResult;
