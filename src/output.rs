// src/output.rs
use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::models::DepositRecord;

fn opt(n: Option<u64>) -> String {
    n.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Write one record as a single line
pub fn write_record<W: Write>(out: &mut W, format: OutputFormat, record: &DepositRecord) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{} {} {} {} {} {}",
            record.block,
            record.pubkey,
            record.withdrawal_credentials,
            opt(record.amount_gwei),
            record.signature,
            opt(record.index),
        ),
        OutputFormat::JsonLines => {
            serde_json::to_writer(&mut *out, record)?;
            out.write_all(b"\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DepositRecord {
        DepositRecord {
            block: 29_030_000,
            pubkey: "0xaa".to_string(),
            withdrawal_credentials: "0xbb".to_string(),
            amount_gwei: Some(1_000_000_000),
            signature: "0xcc".to_string(),
            index: None,
        }
    }

    #[test]
    fn text_line() {
        let mut buf = Vec::new();
        write_record(&mut buf, OutputFormat::Text, &record()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "29030000 0xaa 0xbb 1000000000 0xcc -\n"
        );
    }

    #[test]
    fn json_line() {
        let mut buf = Vec::new();
        write_record(&mut buf, OutputFormat::JsonLines, &record()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));

        let v: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(v["block"], 29_030_000);
        assert_eq!(v["pubkey"], "0xaa");
        assert_eq!(v["amount_gwei"], 1_000_000_000u64);
        assert!(v["index"].is_null());
    }
}
