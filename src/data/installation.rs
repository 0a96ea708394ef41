use serde::{Deserialize, Serialize};

/// A bookable facility as listed by `GET /installations`.
///
/// Older backend builds answer with Spanish field names; the aliases fold
/// both shapes into this one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub id: i64,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, rename = "type", alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default, alias = "activa")]
    pub active: Option<bool>,
}

impl Installation {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Instalación #{}", self.id),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    pub fn kind(&self) -> InstallationKind {
        InstallationKind::from_tag(self.kind.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationKind {
    Padel,
    Tenis,
    Futbol,
    FutbolSala,
    Multiuso,
    Other(String),
    Unknown,
}

impl InstallationKind {
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return InstallationKind::Unknown;
        };
        match tag.to_uppercase().as_str() {
            "PADEL" | "PÁDEL" | "PADEL_VIEJA" | "PADEL_NUEVA" => InstallationKind::Padel,
            "TENIS" => InstallationKind::Tenis,
            "CAMPO_FUTBOL" | "FUTBOL" | "FÚTBOL" => InstallationKind::Futbol,
            "FUTBOL_SALA" => InstallationKind::FutbolSala,
            "MULTIUSO" | "MULTIPISTA" => InstallationKind::Multiuso,
            other => InstallationKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            InstallationKind::Padel => "Pádel".to_string(),
            InstallationKind::Tenis => "Tenis".to_string(),
            InstallationKind::Futbol => "Fútbol".to_string(),
            InstallationKind::FutbolSala => "Fútbol sala".to_string(),
            InstallationKind::Multiuso => "Multiuso".to_string(),
            InstallationKind::Other(raw) => capitalize(raw),
            InstallationKind::Unknown => "Sin tipo".to_string(),
        }
    }
}

fn capitalize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Type filter offered on the listing page. Matches by tag prefix so that
/// `PADEL_VIEJA` and `PADEL_NUEVA` both count as pádel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindFilter {
    Padel,
    Tenis,
    Futbol,
    Multiuso,
}

impl KindFilter {
    pub const ALL: [KindFilter; 4] = [
        KindFilter::Padel,
        KindFilter::Tenis,
        KindFilter::Futbol,
        KindFilter::Multiuso,
    ];

    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PADEL" => Some(KindFilter::Padel),
            "TENIS" => Some(KindFilter::Tenis),
            "FUTBOL" => Some(KindFilter::Futbol),
            "MULTIUSO" => Some(KindFilter::Multiuso),
            _ => None,
        }
    }

    pub fn as_value(self) -> &'static str {
        match self {
            KindFilter::Padel => "PADEL",
            KindFilter::Tenis => "TENIS",
            KindFilter::Futbol => "FUTBOL",
            KindFilter::Multiuso => "MULTIUSO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KindFilter::Padel => "Pádel",
            KindFilter::Tenis => "Tenis",
            KindFilter::Futbol => "Fútbol",
            KindFilter::Multiuso => "Multiuso",
        }
    }

    pub fn matches(self, installation: &Installation) -> bool {
        let tag = installation
            .kind
            .as_deref()
            .unwrap_or_default()
            .to_uppercase();
        match self {
            KindFilter::Padel => tag.starts_with("PADEL"),
            KindFilter::Tenis => tag.starts_with("TENIS"),
            KindFilter::Futbol => tag.starts_with("CAMPO_FUTBOL") || tag.starts_with("FUTBOL"),
            KindFilter::Multiuso => tag.starts_with("MULTIPISTA") || tag.starts_with("MULTIUSO"),
        }
    }
}

pub fn filter_installations(
    installations: &[Installation],
    search: &str,
    kind: Option<KindFilter>,
) -> Vec<Installation> {
    let needle = search.trim().to_lowercase();
    installations
        .iter()
        .filter(|inst| inst.is_active())
        .filter(|inst| {
            needle.is_empty()
                || inst.display_name().to_lowercase().contains(&needle)
                || inst.kind().label().to_lowercase().contains(&needle)
        })
        .filter(|inst| kind.map_or(true, |k| k.matches(inst)))
        .cloned()
        .collect()
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 instalación".to_string()
    } else {
        format!("{n} instalaciones")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<Installation> {
        serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Pádel Norte", "type": "PADEL_NUEVA", "number": 1, "active": true },
            { "id": 2, "nombre": "Pista central", "tipo": "TENIS", "activa": true },
            { "id": 3, "name": "Campo municipal", "type": "CAMPO_FUTBOL", "active": false },
            { "id": 4, "name": "Polideportivo", "type": "MULTIPISTA" },
            { "id": 5, "type": "FUTBOL_SALA" }
        ]))
        .unwrap()
    }

    #[test]
    fn spanish_field_names_are_folded_in() {
        let list = catalogue();
        assert_eq!(list[1].display_name(), "Pista central");
        assert_eq!(list[1].kind(), InstallationKind::Tenis);
        assert!(list[3].is_active());
        assert_eq!(list[4].display_name(), "Instalación #5");
    }

    #[test]
    fn inactive_installations_are_hidden() {
        let shown = filter_installations(&catalogue(), "", None);
        let ids: Vec<i64> = shown.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn search_matches_name_or_kind_label() {
        let list = catalogue();
        let by_name: Vec<i64> = filter_installations(&list, "  CENTRAL ", None)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(by_name, vec![2]);

        let by_label: Vec<i64> = filter_installations(&list, "multiuso", None)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(by_label, vec![4]);
    }

    #[test]
    fn kind_filter_matches_by_prefix() {
        let list = catalogue();
        let padel = filter_installations(&list, "", Some(KindFilter::Padel));
        assert_eq!(padel.len(), 1);
        let futbol: Vec<i64> = filter_installations(&list, "", Some(KindFilter::Futbol))
            .iter()
            .map(|i| i.id)
            .collect();
        // FUTBOL_SALA starts with FUTBOL; the inactive field is excluded.
        assert_eq!(futbol, vec![5]);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(InstallationKind::from_tag(None).label(), "Sin tipo");
        assert_eq!(InstallationKind::from_tag(Some("padel_vieja")).label(), "Pádel");
        assert_eq!(InstallationKind::from_tag(Some("FRONTON")).label(), "Fronton");
        assert_eq!(count_label(1), "1 instalación");
        assert_eq!(count_label(0), "0 instalaciones");
    }
}
