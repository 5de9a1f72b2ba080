use std::collections::BTreeSet;

use serde::Serialize;

/// (province, [(district, code)]) in the order they are offered to agents.
const CATALOG: &[(&str, &[(&str, &str)])] = &[
    (
        "서울특별시",
        &[
            ("강남구", "11680"),
            ("서초구", "11650"),
            ("송파구", "11710"),
            ("영등포구", "11560"),
            ("마포구", "11440"),
        ],
    ),
    (
        "부산광역시",
        &[
            ("해운대구", "26350"),
            ("부산진구", "26230"),
            ("동래구", "26260"),
        ],
    ),
    (
        "인천광역시",
        &[("연수구", "28185"), ("남동구", "28177"), ("서구", "28260")],
    ),
    (
        "경기도",
        &[
            ("성남시 분당구", "41135"),
            ("수원시 영통구", "41113"),
            ("용인시 수지구", "41465"),
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct District {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Province {
    pub name: String,
    pub districts: Vec<District>,
}

/// Province → district → code reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionCatalog {
    provinces: Vec<Province>,
}

impl JurisdictionCatalog {
    pub fn standard() -> Self {
        let provinces = CATALOG
            .iter()
            .map(|(province, districts)| Province {
                name: province.to_string(),
                districts: districts
                    .iter()
                    .map(|(name, code)| District {
                        name: name.to_string(),
                        code: code.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self { provinces }
    }

    /// Restrict the catalog to the agent's authorized codes. Provinces left
    /// without districts are dropped; ordering is preserved.
    pub fn allowed(&self, codes: &BTreeSet<String>) -> Self {
        let provinces = self
            .provinces
            .iter()
            .filter_map(|province| {
                let districts: Vec<District> = province
                    .districts
                    .iter()
                    .filter(|district| codes.contains(&district.code))
                    .cloned()
                    .collect();
                (!districts.is_empty()).then(|| Province {
                    name: province.name.clone(),
                    districts,
                })
            })
            .collect();
        Self { provinces }
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn code_for(&self, province: &str, district: &str) -> Option<&str> {
        self.provinces
            .iter()
            .find(|candidate| candidate.name == province)?
            .districts
            .iter()
            .find(|candidate| candidate.name == district)
            .map(|found| found.code.as_str())
    }
}
