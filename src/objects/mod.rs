/*!
 * Object Registry
 *
 * Fixed-capacity pools of control blocks, opaque identifiers that name
 * them, and 32-bit names for lookup by the native API.
 */

mod id;
mod information;
mod name;

pub use id::{ObjectApi, ObjectClass, ObjectId};
pub use information::{ObjectInformation, ObjectTable};
pub use name::ObjectName;
