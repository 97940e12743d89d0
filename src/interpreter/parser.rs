/// Parser entry points and the shared result type.
pub mod core;
/// Precedence-climbing expression parsing over a static operator table.
pub mod expression;
/// Statement dispatch and the grammar for each statement form.
pub mod statement;
/// Small shared helpers (identifiers, comma-separated lists, expectations).
pub mod utils;
