/// Declares a string-backed identifier enum.
///
/// Each variant maps to a serde name (used in component manifests) and a
/// display name. Unknown serde names deserialize into `Other(String)` so a
/// manifest written for a newer NWDI release still loads.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $serde_name:literal : $display_name:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Other(String),
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.serde_name())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(match s.as_str() {
                    $(
                        $serde_name => Self::$variant,
                    )*
                    _ => Self::Other(s),
                })
            }
        }

        impl $enum_name {
            pub fn serde_name(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $serde_name,
                    )*
                    Self::Other(name) => name,
                }
            }

            pub fn name(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $display_name,
                    )*
                    Self::Other(name) => name,
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}
