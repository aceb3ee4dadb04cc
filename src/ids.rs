/// Declares an integer row id newtype that can be stored with sqlx,
/// read from forms and path segments, and rendered into URIs.
#[macro_export]
macro_rules! id_newtype {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            sqlx::Type,
            serde::Serialize,
            rocket::UriDisplayPath,
        )]
        #[sqlx(transparent)]
        #[serde(transparent)]
        $vis struct $name(pub(crate) i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }

        impl<'a> rocket::request::FromParam<'a> for $name {
            type Error = std::num::ParseIntError;

            fn from_param(param: &'a str) -> Result<Self, Self::Error> {
                param.parse()
            }
        }

        #[rocket::async_trait]
        impl<'r> rocket::form::FromFormField<'r> for $name {
            fn from_value(field: rocket::form::ValueField<'r>) -> rocket::form::Result<'r, Self> {
                <i64 as rocket::form::FromFormField<'r>>::from_value(field).map($name)
            }
        }
    };
}
