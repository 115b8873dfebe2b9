//! Static sector → job-title reference data.

pub const SECTORS: [&str; 5] = ["TI", "RH", "FINANCEIRO", "COMERCIAL", "OPERACIONAL"];

/// Valid titles for `sector`; empty for unknown sectors.
pub fn titles_for(sector: &str) -> &'static [&'static str] {
    match sector {
        "TI" => &["DESENVOLVEDOR", "ANALISTA", "COORDENADOR", "GERENTE"],
        "RH" => &["ANALISTA", "COORDENADOR", "GERENTE"],
        "FINANCEIRO" => &["ANALISTA", "CONTADOR", "GERENTE", "DIRETOR"],
        "COMERCIAL" => &["VENDEDOR", "ANALISTA", "GERENTE", "DIRETOR"],
        "OPERACIONAL" => &["OPERADOR", "SUPERVISOR", "COORDENADOR", "GERENTE"],
        _ => &[],
    }
}

pub fn is_valid_title(sector: &str, title: &str) -> bool {
    titles_for(sector).contains(&title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sector_has_titles() {
        for s in SECTORS {
            assert!(!titles_for(s).is_empty(), "{s}");
        }
        assert!(titles_for("MARKETING").is_empty());
    }

    #[test]
    fn title_belongs_to_sector() {
        assert!(is_valid_title("TI", "DESENVOLVEDOR"));
        assert!(!is_valid_title("RH", "DESENVOLVEDOR"));
        assert!(!is_valid_title("", "ANALISTA"));
    }
}
