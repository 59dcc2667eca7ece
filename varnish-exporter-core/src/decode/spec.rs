use std::fmt;

/// The closed set of fields the exporter asks varnishncsa to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Method,
    Status,
    Path,
    Cache,
    Host,
    Time,
    TimeFirstByte,
    RespSize,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Method => "method",
            FieldName::Status => "status",
            FieldName::Path => "path",
            FieldName::Cache => "cache",
            FieldName::Host => "host",
            FieldName::Time => "time",
            FieldName::TimeFirstByte => "time_firstbyte",
            FieldName::RespSize => "respsize",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// `name="value"`, value runs to the next unescaped `"`.
    Quoted,
    /// `name=value` or `name:value`, value runs to the next space.
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    /// Non-negative decimal number.
    Decimal,
    /// Non-negative byte count; CLF writes `-` for zero.
    Bytes,
}

impl ValueKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Bytes => "byte count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: FieldName,
    /// Literal token prefix including the delimiter, e.g. `status=` or `time:`.
    pub prefix: &'static str,
    pub quoting: Quoting,
    pub kind: ValueKind,
    pub required: bool,
    /// varnishncsa format directive producing the value.
    pub directive: &'static str,
}

impl FieldDef {
    /// This field's fragment of the varnishncsa `-F` format.
    pub fn format_token(&self) -> String {
        match self.quoting {
            Quoting::Quoted => format!("{}\"{}\"", self.prefix, self.directive),
            Quoting::Bare => format!("{}{}", self.prefix, self.directive),
        }
    }
}

const METHOD: FieldDef = FieldDef {
    name: FieldName::Method,
    prefix: "method=",
    quoting: Quoting::Quoted,
    kind: ValueKind::Text,
    required: true,
    directive: "%m",
};

const STATUS: FieldDef = FieldDef {
    name: FieldName::Status,
    prefix: "status=",
    quoting: Quoting::Bare,
    kind: ValueKind::Integer,
    required: true,
    directive: "%s",
};

const PATH: FieldDef = FieldDef {
    name: FieldName::Path,
    prefix: "path=",
    quoting: Quoting::Quoted,
    kind: ValueKind::Text,
    required: true,
    directive: "%U",
};

const CACHE: FieldDef = FieldDef {
    name: FieldName::Cache,
    prefix: "cache=",
    quoting: Quoting::Quoted,
    kind: ValueKind::Text,
    required: false,
    directive: "%{Varnish:hitmiss}x",
};

const HOST: FieldDef = FieldDef {
    name: FieldName::Host,
    prefix: "host=",
    quoting: Quoting::Quoted,
    kind: ValueKind::Text,
    required: false,
    directive: "%{host}i",
};

const TIME: FieldDef = FieldDef {
    name: FieldName::Time,
    prefix: "time:",
    quoting: Quoting::Bare,
    kind: ValueKind::Decimal,
    required: true,
    directive: "%D",
};

const TIME_FIRSTBYTE: FieldDef = FieldDef {
    name: FieldName::TimeFirstByte,
    prefix: "time_firstbyte:",
    quoting: Quoting::Bare,
    kind: ValueKind::Decimal,
    required: false,
    directive: "%{Varnish:time_firstbyte}x",
};

const RESPSIZE: FieldDef = FieldDef {
    name: FieldName::RespSize,
    prefix: "respsize:",
    quoting: Quoting::Bare,
    kind: ValueKind::Bytes,
    required: false,
    directive: "%b",
};

/// Which optional fields the producer is asked to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub first_byte: bool,
    pub sizes: bool,
}

/// Ordered field layout shared by the producer format and the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<FieldDef>,
}

impl FieldSpec {
    pub fn new(options: FieldOptions) -> Self {
        let mut fields = vec![METHOD, STATUS, PATH, CACHE, HOST, TIME];
        if options.first_byte {
            fields.push(TIME_FIRSTBYTE);
        }
        if options.sizes {
            fields.push(RESPSIZE);
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn get(&self, name: FieldName) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: FieldName) -> bool {
        self.get(name).is_some()
    }

    /// Field whose prefix starts `token`, if any.
    pub(crate) fn match_prefix(&self, token: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| token.starts_with(f.prefix))
    }

    /// The varnishncsa `-F` argument producing this layout.
    pub fn varnishncsa_format(&self) -> String {
        self.fields
            .iter()
            .map(FieldDef::format_token)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::new(FieldOptions::default())
    }
}
