//! CSV serialization of the table's unpaginated row form.

use crate::table::TableRow;

const HEADER: &str = "date,user,user_id,event_type,count";

/// Serialize rows as RFC4180-style CSV: header first, fields containing
/// the delimiter, quotes, or newlines are quoted with doubled quotes.
/// Dates are already ISO-formatted by the query layer.
pub fn to_csv(rows: &[TableRow]) -> String {
    let mut out = String::with_capacity(64 + rows.len() * 48);
    out.push_str(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&escape(&row.date));
        out.push(',');
        out.push_str(&escape(&row.user));
        out.push(',');
        out.push_str(&escape(&row.user_id));
        out.push(',');
        out.push_str(&escape(&row.event_type));
        out.push(',');
        out.push_str(&row.count.to_string());
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str) -> TableRow {
        TableRow {
            date: "2025-07-01".into(),
            user: user.into(),
            user_id: "u1".into(),
            event_type: "View".into(),
            count: 3,
        }
    }

    #[test]
    fn header_is_always_present() {
        assert_eq!(to_csv(&[]), "date,user,user_id,event_type,count\n");
    }

    #[test]
    fn plain_fields_are_unquoted() {
        let csv = to_csv(&[row("Alice")]);
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "2025-07-01,Alice,u1,View,3"
        );
    }

    #[test]
    fn delimiters_quotes_and_newlines_are_quoted() {
        let csv = to_csv(&[row("Ng, \"Ada\"")]);
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "2025-07-01,\"Ng, \"\"Ada\"\"\",u1,View,3"
        );

        let csv = to_csv(&[row("line\nbreak")]);
        assert!(csv.contains("\"line\nbreak\""));
    }
}
