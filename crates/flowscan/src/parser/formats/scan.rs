use super::normalize_flags;
use crate::parser::model::EndpointText;
use crate::parser::traits::{BlockFields, FieldLocator, ParseError, ParseStrategy, RawBlock};

/// Permissive label scanner.
///
/// Walks whitespace-separated tokens line by line and picks up any known
/// label in `label value`, `label: value` or `label=value` form. Text it does
/// not recognize is ignored, so missing pieces only surface when the record
/// is built.
pub struct ScanLocator;

fn strip_comma(token: &str) -> &str {
    token.trim_end_matches(',')
}

fn is_flags_label(token: &str) -> bool {
    matches!(strip_comma(token), "flags" | "flags:")
}

fn stops_flags(token: &str) -> bool {
    let bare = strip_comma(token);
    let label = bare.trim_end_matches(':');
    BlockFields::is_field_label(label) || bare.contains('=') || bare.starts_with("Internal-Data")
}

impl ScanLocator {
    fn header(line: &str, fields: &mut BlockFields) {
        let mut tokens = line.split_whitespace();
        fields.protocol = tokens.next().map(str::to_string);

        let mut interface: Option<String> = None;
        for token in tokens {
            let bare = strip_comma(token);
            if bare.is_empty() {
                continue;
            }
            if let Some(name) = bare.strip_suffix(':') {
                interface = Some(name.to_string());
                continue;
            }

            let endpoint = EndpointText { interface: interface.take(), address: bare.to_string() };
            if fields.source.is_none() {
                fields.source = Some(endpoint);
            } else if fields.destination.is_none() {
                fields.destination = Some(endpoint);
            } else {
                break;
            }
        }
    }

    fn field_line(line: &str, fields: &mut BlockFields) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i];
            let bare = strip_comma(token);
            i += 1;

            if is_flags_label(token) {
                let start = i;
                while i < tokens.len() && !stops_flags(tokens[i]) {
                    i += 1;
                    if tokens[i - 1].ends_with(',') {
                        break;
                    }
                }
                fields.flags = Some(normalize_flags(tokens[start..i].iter().copied().map(strip_comma)));
                continue;
            }

            if bare.starts_with("Internal-Data") {
                fields.internal_interface = Some(bare.to_string());
                continue;
            }

            if let Some((label, value)) = bare.split_once('=') {
                if label == "flags" {
                    fields.flags = Some(normalize_flags(std::iter::once(value)));
                } else {
                    fields.set_labelled(label, value.to_string());
                }
                continue;
            }

            let label = bare.strip_suffix(':').unwrap_or(bare);
            if BlockFields::is_field_label(label) && i < tokens.len() {
                fields.set_labelled(label, strip_comma(tokens[i]).to_string());
                i += 1;
            }
        }
    }
}

impl FieldLocator for ScanLocator {
    fn locate(&self, block: &RawBlock<'_>) -> Result<BlockFields, ParseError> {
        let mut fields = BlockFields::default();
        Self::header(block.header(), &mut fields);
        for (_, line) in block.body() {
            Self::field_line(line, &mut fields);
        }
        Ok(fields)
    }

    fn strategy(&self) -> ParseStrategy {
        ParseStrategy::Scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(text: &str) -> BlockFields {
        ScanLocator.locate(&RawBlock { line: 1, text }).unwrap()
    }

    #[test]
    fn test_scan_label_forms() {
        let fields = locate(
            "TCP outside: 10.0.0.1:80 inside: 10.0.0.2:443\n  uptime: 2h, bytes=1.5GB; colour blue idle 3s\n",
        );
        assert_eq!(fields.uptime.as_deref(), Some("2h"));
        assert_eq!(fields.bytes.as_deref(), Some("1.5GB;"));
        assert_eq!(fields.idle.as_deref(), Some("3s"));
        assert_eq!(fields.source.unwrap().interface.as_deref(), Some("outside"));
    }

    #[test]
    fn test_scan_flags_stop_at_comma_or_label() {
        let fields = locate("UDP a: 1.1.1.1/1 b: 2.2.2.2/2\n flags - N1, idle 2s\n");
        assert_eq!(fields.flags.as_deref(), Some("- N1"));

        let fields = locate("UDP a: 1.1.1.1/1 b: 2.2.2.2/2\n flags N2* N3* uptime 4d\n");
        assert_eq!(fields.flags.as_deref(), Some("N2* N3*"));
        assert_eq!(fields.uptime.as_deref(), Some("4d"));

        let fields = locate("UDP a: 1.1.1.1/1 b: 2.2.2.2/2\n flags=UIO\n");
        assert_eq!(fields.flags.as_deref(), Some("UIO"));
    }

    #[test]
    fn test_scan_tolerates_missing_destination() {
        let fields = locate("TCP outside: 10.0.0.1/80,\n    flags U, bytes 12\n");
        assert_eq!(fields.protocol.as_deref(), Some("TCP"));
        assert_eq!(fields.source.unwrap().address, "10.0.0.1/80");
        assert!(fields.destination.is_none());
        assert_eq!(fields.bytes.as_deref(), Some("12"));
    }

    #[test]
    fn test_scan_parties_and_keyid() {
        let fields = locate(
            "TCP a: 1.1.1.1/1 b: 2.2.2.2/2\n Initiator: 1.1.1.1, Responder: 2.2.2.2\n Connection lookup keyid: 99\n",
        );
        assert_eq!(fields.initiator.as_deref(), Some("1.1.1.1"));
        assert_eq!(fields.responder.as_deref(), Some("2.2.2.2"));
        assert_eq!(fields.connection_id.as_deref(), Some("99"));
    }
}
