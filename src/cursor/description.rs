use crate::driver::ColumnMetadata;

/// One entry of `Cursor::description`, the DB-API 7-tuple.
///
/// `display_size` and `internal_size` both carry the driver's reported display size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub type_code: i32,
    pub display_size: i32,
    pub internal_size: i32,
    pub precision: i32,
    pub scale: i32,
    pub null_ok: bool,
}

impl From<&ColumnMetadata> for ColumnDescription {
    fn from(meta: &ColumnMetadata) -> Self {
        Self {
            name: meta.name.clone(),
            type_code: meta.type_code,
            display_size: meta.display_size,
            internal_size: meta.display_size,
            precision: meta.precision,
            scale: meta.scale,
            null_ok: meta.nullable != 0,
        }
    }
}

impl ColumnDescription {
    /// The description as a tuple, in DB-API field order.
    #[must_use]
    pub fn as_tuple(&self) -> (&str, i32, i32, i32, i32, i32, bool) {
        (
            &self.name,
            self.type_code,
            self.display_size,
            self.internal_size,
            self.precision,
            self.scale,
            self.null_ok,
        )
    }
}
