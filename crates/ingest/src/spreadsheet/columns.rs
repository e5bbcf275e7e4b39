use calamine::Data;
use unicode_normalization::UnicodeNormalization;

use super::cells::cell_text;
use super::FormatError;

/// Header labels in the order they are reported.
pub const REQUIRED_LABELS: [&str; 4] = ["Numero", "Data", "Horario", "ID"];

/// Position of each required column within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub numero: usize,
    pub data: usize,
    pub horario: usize,
    pub id: usize,
}

/// Fold a header label for comparison: trimmed, lowercased, and with
/// combining diacritics (U+0300..U+036F) removed after NFD decomposition,
/// so `"Número "` and `"NUMERO"` both become `"numero"`.
pub fn fold_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Locate the required columns in a header row. The first matching cell
/// wins when a label repeats.
pub fn resolve_columns(header: &[Data]) -> Result<ColumnIndex, FormatError> {
    let folded: Vec<String> = header.iter().map(|cell| fold_label(&cell_text(cell))).collect();
    let position = |label: &str| {
        let wanted = fold_label(label);
        folded.iter().position(|h| *h == wanted)
    };

    let found = REQUIRED_LABELS.map(position);
    match found {
        [Some(numero), Some(data), Some(horario), Some(id)] => Ok(ColumnIndex {
            numero,
            data,
            horario,
            id,
        }),
        _ => Err(FormatError::MissingColumns {
            missing: REQUIRED_LABELS
                .iter()
                .zip(found)
                .filter(|(_, idx)| idx.is_none())
                .map(|(label, _)| *label)
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(labels: &[&str]) -> Vec<Data> {
        labels.iter().map(|l| Data::String(l.to_string())).collect()
    }

    #[test]
    fn fold_strips_case_accents_and_padding() {
        assert_eq!(fold_label("Número"), "numero");
        assert_eq!(fold_label("NUMERO"), "numero");
        assert_eq!(fold_label("numero "), "numero");
        assert_eq!(fold_label("Horário"), "horario");
    }

    #[test]
    fn resolves_in_any_order() {
        let columns = resolve_columns(&header(&["ID", "horário", "DATA", "Número"])).unwrap();
        assert_eq!(
            columns,
            ColumnIndex {
                numero: 3,
                data: 2,
                horario: 1,
                id: 0
            }
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let columns =
            resolve_columns(&header(&["Notas", "Numero", "Data", "Horario", "ID", "Fonte"])).unwrap();
        assert_eq!(columns.numero, 1);
        assert_eq!(columns.id, 4);
    }

    #[test]
    fn first_duplicate_wins() {
        let columns = resolve_columns(&header(&["Numero", "Data", "Horario", "ID", "id"])).unwrap();
        assert_eq!(columns.id, 3);
    }

    #[test]
    fn missing_id_is_reported() {
        let err = resolve_columns(&header(&["Numero", "Data", "Horario"])).unwrap_err();
        match &err {
            FormatError::MissingColumns { missing } => assert_eq!(missing, &vec!["ID"]),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
        assert!(err.to_string().contains("Numero, Data, Horario, ID"));
    }

    #[test]
    fn non_text_header_cells_do_not_match() {
        let mut row = header(&["Numero", "Data", "Horario"]);
        row.push(Data::Float(1.0));
        assert!(resolve_columns(&row).is_err());
    }
}
