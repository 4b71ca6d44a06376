//! Internal macros.

/// Declares a string-keyed option enum.
///
/// Generates the enum with its `Default`, the `(key, description)` list,
/// `FromStr` (accepting `"default"` as well as each key) and `Display`.
macro_rules! strategy {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($key:literal, $desc:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[doc = $desc]
                $variant,
            )+
        }

        impl $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The string key of this selection.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Human-readable description.
            pub const fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => $desc,)+
                }
            }

            /// All `(key, description)` pairs.
            pub fn list() -> Vec<(&'static str, &'static str)> {
                Self::ALL.iter().map(|v| (v.as_str(), v.description())).collect()
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(key: &str) -> ::std::result::Result<Self, Self::Err> {
                match key {
                    "default" => Ok(Self::$default),
                    $($key => Ok(Self::$variant),)+
                    _ => Err($crate::error::Error::option($kind, key)),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
