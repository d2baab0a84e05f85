/// Database engine behind a schema provider, selected by driver tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Driver {
    MySql,
    PostgreSql,
    Sqlite,
    SqlServer,
    /// Any tag without a catalog adapter; carries the original tag
    Unsupported(String),
}

impl Driver {
    /// Resolve a driver tag. Laravel's names (`mysql`, `pgsql`, `sqlite`,
    /// `sqlsrv`) and the usual aliases are recognised; anything else is
    /// [`Driver::Unsupported`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Driver::MySql,
            "pgsql" | "postgres" | "postgresql" => Driver::PostgreSql,
            "sqlite" | "sqlite3" => Driver::Sqlite,
            "sqlsrv" | "mssql" | "sqlserver" => Driver::SqlServer,
            _ => Driver::Unsupported(tag.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Driver::Unsupported(_))
    }

    /// Canonical tag
    pub fn tag(&self) -> &str {
        match self {
            Driver::MySql => "mysql",
            Driver::PostgreSql => "pgsql",
            Driver::Sqlite => "sqlite",
            Driver::SqlServer => "sqlsrv",
            Driver::Unsupported(tag) => tag,
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Driver {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Driver::from_tag(s))
    }
}
