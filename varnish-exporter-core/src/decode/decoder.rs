use crate::decode::{DecodeError, DecodedFields, FieldDef, FieldSpec, Quoting, ValueKind};

/// Decoder bound to the field layout the producer was started with.
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    spec: FieldSpec,
}

impl LineDecoder {
    pub fn new(spec: FieldSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn decode(&self, line: &str) -> Result<DecodedFields, DecodeError> {
        decode(line, &self.spec)
    }
}

/// Decode one log line against `spec`.
///
/// Tokens are separated by spaces. A token starting with a known field prefix is
/// read according to that field's quoting; anything else is skipped, including
/// quoted values that contain spaces. When a field appears twice the first
/// occurrence wins.
pub fn decode(line: &str, spec: &FieldSpec) -> Result<DecodedFields, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let bytes = line.as_bytes();
    let mut fields = DecodedFields::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b' ' {
            pos += 1;
            continue;
        }

        let Some(def) = spec.match_prefix(&line[pos..]) else {
            pos = skip_token(line, pos);
            continue;
        };

        let value_start = pos + def.prefix.len();
        let (raw, next) = match def.quoting {
            Quoting::Quoted => {
                if bytes.get(value_start) != Some(&b'"') {
                    return Err(DecodeError::ExpectedQuote { field: def.name });
                }
                read_quoted(line, value_start + 1)
                    .ok_or(DecodeError::UnterminatedQuote { field: def.name })?
            }
            Quoting::Bare => read_bare(line, value_start),
        };

        if let Some(value) = validate(def, raw)? {
            fields.insert(def.name, value);
        }
        pos = next;
    }

    if let Some(missing) = spec
        .fields()
        .iter()
        .find(|def| def.required && !fields.contains(def.name))
    {
        return Err(DecodeError::MissingField {
            field: missing.name,
        });
    }

    Ok(fields)
}

/// Read a quoted value starting just after the opening quote.
///
/// Returns the unescaped value and the index just past the closing quote.
fn read_quoted(line: &str, start: usize) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = line[start..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            },
            '"' => return Some((value, start + i + 1)),
            _ => value.push(c),
        }
    }

    None
}

fn read_bare(line: &str, start: usize) -> (String, usize) {
    let end = line[start..]
        .find(' ')
        .map_or(line.len(), |offset| start + offset);
    (line[start..end].to_string(), end)
}

/// Skip a token no field claims; quoted sections may contain spaces.
fn skip_token(line: &str, pos: usize) -> usize {
    let bytes = line.as_bytes();
    let mut i = pos;

    while i < bytes.len() && bytes[i] != b' ' {
        if bytes[i] == b'"' {
            match read_quoted(line, i + 1) {
                Some((_, end)) => {
                    i = end;
                    continue;
                }
                None => return bytes.len(),
            }
        }
        i += 1;
    }

    i
}

/// Check `raw` against the field's kind.
///
/// varnishncsa writes `-` when it has no value. For an optional decimal that
/// leaves the field absent; for a byte count it means zero.
fn validate(def: &FieldDef, raw: String) -> Result<Option<String>, DecodeError> {
    let invalid = |raw: String| DecodeError::InvalidValue {
        field: def.name,
        expected: def.kind.describe(),
        value: raw,
    };

    match def.kind {
        ValueKind::Text => Ok(Some(raw)),
        ValueKind::Integer => match raw.parse::<u16>() {
            Ok(_) => Ok(Some(raw)),
            Err(_) => Err(invalid(raw)),
        },
        ValueKind::Decimal if !def.required && raw == "-" => Ok(None),
        ValueKind::Decimal => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(raw)),
            _ => Err(invalid(raw)),
        },
        ValueKind::Bytes => {
            if raw == "-" {
                return Ok(Some("0".to_string()));
            }
            match raw.parse::<u64>() {
                Ok(_) => Ok(Some(raw)),
                Err(_) => Err(invalid(raw)),
            }
        }
    }
}
