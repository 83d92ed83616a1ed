//! Block splitter for `show conn detail` output.
//!
//! A block starts at a protocol header line and runs until the next header or
//! end of input. Anything before the first header (prompt, legend) is skipped.
//! One forward pass; blocks borrow from the input.

use super::model::RawBlock;

/// Keywords that open a connection header line.
pub const PROTOCOL_KEYWORDS: [&str; 9] = ["TCP", "UDP", "ICMP", "ICMP6", "SCTP", "GRE", "ESP", "AH", "IP"];

/// True when the line starts with a protocol keyword followed by more text.
pub fn is_header_line(line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), Some(_)) => {
            // Headers are never indented; field lines always are.
            !line.starts_with(char::is_whitespace) && PROTOCOL_KEYWORDS.contains(&first)
        }
        _ => false,
    }
}

pub struct BlockSplitter<'a> {
    input: &'a str,
    /// Byte offset of the next unread line
    pos: usize,
    /// 1-based number of the line at `pos`
    line: usize,
}

impl<'a> BlockSplitter<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1 }
    }

    /// Next line and its byte range end (including the newline).
    fn next_line(&self) -> Option<(&'a str, usize)> {
        if self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];
        let end = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let line = rest[..end].trim_end_matches(['\n', '\r']);
        Some((line, self.pos + end))
    }
}

impl<'a> Iterator for BlockSplitter<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip to the next header
        loop {
            let (line, end) = self.next_line()?;
            if is_header_line(line) {
                break;
            }
            self.pos = end;
            self.line += 1;
        }

        let start = self.pos;
        let header_line = self.line;
        self.pos = self.next_line().map(|(_, end)| end).unwrap_or(self.input.len());
        self.line += 1;

        // Accumulate until the next header or end of input
        while let Some((line, end)) = self.next_line() {
            if is_header_line(line) {
                break;
            }
            self.pos = end;
            self.line += 1;
        }

        Some(RawBlock {
            line: header_line,
            text: &self.input[start..self.pos],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
asa# show conn detail
54 in use, 1021 most used
Flags: A - awaiting responder ACK to SYN, a - awaiting initiator ACK to SYN,
       N3 - elephant-flow

UDP FORTISIEM: 10.1.76.4/45879 dc2: 10.1.5.101/53,
    flags - N1, idle 21s, uptime 21s, timeout 2m0s, bytes 28
  Connection lookup keyid: 100587686
TCP FORTISIEM: 10.1.76.3/57798 beproxy: 10.1.19.90/8000,
    flags UIO N1N3, idle 8s, uptime 2h39m, timeout 1h0m, bytes 14395
  Initiator: 10.1.76.3, Responder: 10.1.19.90
  Connection lookup keyid: 1931784606
";

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("TCP outside: 1.1.1.1/1 inside: 2.2.2.2/2,"));
        assert!(is_header_line("ICMP6 a: ::1/0 b: ::2/0"));
        assert!(!is_header_line("TCP"));
        assert!(!is_header_line("   TCP indented: 1.1.1.1/1"));
        assert!(!is_header_line("TCPX a: b"));
        assert!(!is_header_line("Flags: A - awaiting"));
        assert!(!is_header_line(""));
    }

    #[test]
    fn test_splits_blocks_and_skips_preamble() {
        let blocks: Vec<_> = BlockSplitter::new(SAMPLE).collect();
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].line, 6);
        assert!(blocks[0].header().starts_with("UDP FORTISIEM"));
        assert_eq!(blocks[0].body().count(), 2);

        assert_eq!(blocks[1].line, 9);
        assert!(blocks[1].text.ends_with("keyid: 1931784606\n"));
        assert_eq!(blocks[1].body().count(), 3);
    }

    #[test]
    fn test_last_block_without_trailing_newline() {
        let input = "TCP a: 1.1.1.1/1 b: 2.2.2.2/2,\r\n    flags U, bytes 1";
        let blocks: Vec<_> = BlockSplitter::new(input).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body().collect::<Vec<_>>(), vec![(2, "flags U, bytes 1")]);
    }

    #[test]
    fn test_no_headers() {
        assert_eq!(BlockSplitter::new("").count(), 0);
        assert_eq!(BlockSplitter::new("nothing\nto see\n").count(), 0);
    }

    #[test]
    fn test_blocks_cover_input_after_preamble() {
        let total: usize = BlockSplitter::new(SAMPLE).map(|b| b.text.len()).sum();
        let preamble = SAMPLE.find("UDP FORTISIEM").unwrap();
        assert_eq!(total, SAMPLE.len() - preamble);
    }
}
