//! First-row table extraction and positional field mapping
//!
//! The upstream page renders exactly one result as the first `<tr>` of a
//! table. Extraction is deliberately tolerant of attribute noise: only the
//! two-tag `<tr>`/`<td>` convention is assumed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

fn tr_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid regex"))
}

fn td_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid regex"))
}

fn tag_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn space_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Whether the document contains at least one row opening followed by a cell
/// opening. This is the acceptance predicate of the direct fetch tier.
pub fn has_data_row(html: &str) -> bool {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>.*?<td[^>]*>").expect("valid regex"))
        .is_match(html)
}

/// Extracts the cleaned cell texts of the first `<tr>…</tr>` region
///
/// Embedded markup is stripped, non-breaking spaces and whitespace runs are
/// collapsed to single spaces, and cells that clean to nothing are dropped.
/// No row region yields an empty vec, same as a row whose cells are all empty.
pub fn extract_first_row(html: &str) -> Vec<String> {
    let Some(m) = tr_rx().captures(html) else {
        return Vec::new();
    };
    let row = &m[1];

    td_rx()
        .captures_iter(row)
        .filter_map(|cell| {
            let text = tag_rx().replace_all(&cell[1], "");
            let text = text.replace('\u{a0}', " ");
            let text = space_rx().replace_all(&text, " ");
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// Resolved record: the fixed 5-field shape when the row is complete,
/// a positional `campoN` map otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Full {
        nombre: String,
        rut: String,
        genero: String,
        direccion: String,
        comuna: String,
    },
    Campos(BTreeMap<String, String>),
}

/// Maps an extracted row onto a [`Record`]
///
/// Five or more values take the fixed shape in upstream column order, extras
/// discarded. Fewer fall back to `campo1..campoN`; zero values is a valid,
/// empty record.
pub fn map_row(row: &[String]) -> Record {
    if let [nombre, rut, genero, direccion, comuna, ..] = row {
        return Record::Full {
            nombre: nombre.clone(),
            rut: rut.clone(),
            genero: genero.clone(),
            direccion: direccion.clone(),
            comuna: comuna.clone(),
        };
    }
    Record::Campos(
        row.iter()
            .enumerate()
            .map(|(i, v)| (format!("campo{}", i + 1), v.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn five_cells_extract_in_order_and_map_to_named_fields() {
        let html = "<table><tr><td>A</td><td>B</td><td>C</td><td>D</td><td>E</td></tr></table>";
        let row = extract_first_row(html);
        assert_eq!(row, ["A", "B", "C", "D", "E"]);
        assert_eq!(
            serde_json::to_value(map_row(&row)).unwrap(),
            json!({"nombre": "A", "rut": "B", "genero": "C", "direccion": "D", "comuna": "E"})
        );
    }

    #[test]
    fn only_the_first_row_is_read() {
        let html = "<tr><td>uno</td></tr><tr><td>dos</td><td>tres</td></tr>";
        assert_eq!(extract_first_row(html), ["uno"]);
    }

    #[test]
    fn markup_nbsp_and_whitespace_are_cleaned() {
        let html = "<tr>\n  <td class=\"c\"> <b>JUAN</b>&nbsp;\n <i>PEREZ</i> </td>\
                    <td>\u{a0}\u{a0}</td><td>15.421.741-K</td></tr>";
        assert_eq!(extract_first_row(html), ["JUAN&nbsp; PEREZ", "15.421.741-K"]);
    }

    #[test]
    fn three_cells_fall_back_to_positional_fields() {
        let html = "<TR><TD>a</TD><TD>b</TD><TD>c</TD></TR>";
        let row = extract_first_row(html);
        assert_eq!(row.len(), 3);
        assert_eq!(
            serde_json::to_value(map_row(&row)).unwrap(),
            json!({"campo1": "a", "campo2": "b", "campo3": "c"})
        );
    }

    #[test]
    fn extras_beyond_five_are_discarded() {
        let row: Vec<String> = ["n", "r", "g", "d", "c", "x", "y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let value = serde_json::to_value(map_row(&row)).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 5);
        assert_eq!(value["comuna"], "c");
    }

    #[test]
    fn no_row_markup_yields_empty_row_and_empty_record() {
        let row = extract_first_row("<html><body><p>sin resultados</p></body></html>");
        assert!(row.is_empty());
        assert_eq!(serde_json::to_value(map_row(&row)).unwrap(), json!({}));
    }

    #[test]
    fn row_with_only_empty_cells_also_yields_empty_row() {
        assert!(extract_first_row("<tr><td> </td><td><br/></td></tr>").is_empty());
    }

    #[test]
    fn data_row_predicate() {
        assert!(has_data_row("<tr class=\"r\">\n<td>x</td></tr>"));
        assert!(!has_data_row("<table><tr><th>solo encabezado</th></tr></table>"));
        assert!(!has_data_row("<div>challenge</div>"));
    }
}
