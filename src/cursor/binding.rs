use crate::driver::DriverStatement;
use crate::error::DriverError;
use crate::types::RowValues;

/// Bind `params` to `stmt` by position: `params[i]` goes to placeholder `i + 1`.
///
/// Integers, floats and text use the typed setters. Everything else, booleans included, is
/// handed to `set_object` so a boolean never reaches the integer setter.
pub(crate) fn bind_params(
    stmt: &mut dyn DriverStatement,
    params: &[RowValues],
) -> Result<(), DriverError> {
    for (offset, param) in params.iter().enumerate() {
        let index = offset + 1;
        match param {
            RowValues::Int(i) => stmt.set_long(index, *i)?,
            RowValues::Float(f) => stmt.set_double(index, *f)?,
            RowValues::Text(s) => stmt.set_string(index, s)?,
            other => stmt.set_object(index, other)?,
        }
    }
    Ok(())
}
