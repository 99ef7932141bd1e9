/// Declares a struct together with a `Default` impl built from per-field
/// initialisers. Fields without `= expr` fall back to `Default::default()`.
#[macro_export]
macro_rules! default_struct {
    (
        $(#[$struct_meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $type:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $type
            ),*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field: $crate::default_struct!(@init $($default)?)
                    ),*
                }
            }
        }
    };
    (@init) => {
        Default::default()
    };
    (@init $expr:expr) => {
        $expr.into()
    };
}

/// Counts coming back from the store may be NULL; those render as zero and
/// negative values are clamped.
pub fn count(value: Option<i64>) -> u64 {
    value.map_or(0, |v| v.max(0) as u64)
}
