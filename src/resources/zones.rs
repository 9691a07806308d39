use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{Zone, ZoneDraft};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct Zones;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonePageStats {
    pub total: usize,
    pub active: usize,
    pub pincodes: usize,
    pub cities: usize,
}

#[derive(Debug, Clone)]
pub enum ZoneAction {
    Create(ZoneDraft),
    Update { id: String, draft: ZoneDraft },
    ToggleStatus { id: String },
    Delete { id: String },
}

impl Resource for Zones {
    type Item = Zone;
    type Detail = Zone;
    type Stats = ZonePageStats;
    type Action = ZoneAction;

    const NAME: &'static str = "zones";
    const EMPTY_MESSAGE: &'static str = "No zones found";
    const LIST_PATH: &'static str = endpoints::ZONES;
    const LIST_KEY: &'static str = "zones";
    const DETAIL_KEY: Option<&'static str> = Some("zone");

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::text("city"),
            FilterField::text("state"),
            FilterField::boolean("isActive"),
            FilterField::text("search"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::zone(id)
    }

    fn page_stats(items: &[Zone]) -> ZonePageStats {
        let mut cities: Vec<String> = items
            .iter()
            .filter_map(|z| z.city.as_deref())
            .map(|c| c.trim().to_lowercase())
            .collect();
        cities.sort();
        cities.dedup();

        ZonePageStats {
            total: items.len(),
            active: items.iter().filter(|z| z.is_active).count(),
            pincodes: items.iter().map(|z| z.pincodes.len()).sum(),
            cities: cities.len(),
        }
    }

    fn mutation(action: &ZoneAction) -> Result<Mutation, String> {
        match action {
            ZoneAction::Create(draft) => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::ZONES, json!(draft)),
                    "Zone created",
                    "Failed to create zone",
                ))
            }
            ZoneAction::Update { id, draft } => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::put(endpoints::zone(id), json!(draft)),
                    "Zone updated",
                    "Failed to update zone",
                ))
            }
            ZoneAction::ToggleStatus { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::zone_toggle(id), None),
                "Zone status updated",
                "Failed to update zone status",
            )),
            ZoneAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::zone(id)),
                "Zone deleted",
                "Failed to delete zone",
            )
            .confirm("Are you sure you want to delete this zone?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> ZoneDraft {
        ZoneDraft {
            zone_name: "Koramangala".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            pincodes: ZoneDraft::parse_pincodes("560034, 560095,,"),
            service_radius: Some(5.0),
            coordinates: None,
        }
    }

    #[test]
    fn test_pincode_parsing_and_validation() {
        let d = draft();
        assert_eq!(d.pincodes, vec!["560034", "560095"]);
        assert!(d.validate().is_ok());

        let mut d = draft();
        d.pincodes.push("5600".into());
        assert_eq!(d.validate().unwrap_err(), "Invalid pincode: 5600");

        let mut d = draft();
        d.pincodes.clear();
        assert!(Zones::mutation(&ZoneAction::Create(d)).is_err());
    }

    #[test]
    fn test_page_stats_distinct_cities() {
        let items: Vec<Zone> = serde_json::from_value(json!([
            { "_id": "z1", "zoneName": "A", "city": "Pune", "isActive": true, "pincodes": ["411001", "411002"] },
            { "_id": "z2", "zoneName": "B", "city": "pune ", "pincodes": ["411003"] },
            { "_id": "z3", "zoneName": "C", "city": "Mumbai", "isActive": true }
        ]))
        .unwrap();
        let stats = Zones::page_stats(&items);
        assert_eq!(stats, ZonePageStats { total: 3, active: 2, pincodes: 3, cities: 2 });
    }

    #[test]
    fn test_delete_is_confirmed() {
        let m = Zones::mutation(&ZoneAction::Delete { id: "z1".into() }).unwrap();
        assert_eq!(m.confirm.as_deref(), Some("Are you sure you want to delete this zone?"));
    }

    #[test]
    fn test_inactive_zones_filter_is_sent() {
        let state = crate::filters::FilterState::new(10).with("isActive", false);
        assert!(state
            .sanitize(Zones::filter_schema())
            .contains(&("isActive".to_string(), "false".to_string())));
    }

    #[test]
    fn test_odd_rows_still_decode() {
        use crate::domain::Coordinates;

        let items = crate::resources::decode_rows::<Zones>(json!([
            { "_id": "z1", "zoneName": "Kothrud", "pincodes": null,
              "coordinates": { "type": "Point", "coordinates": [73.80, 18.50] } },
            { "_id": "z2", "zoneName": "Andheri", "coordinates": { "lat": 19.11, "lng": 72.86 } },
            { "_id": "z3", "zoneName": "Unmapped", "coordinates": "n/a", "isActive": null }
        ]));
        assert_eq!(items.len(), 3);
        assert!(items[0].pincodes.is_empty());
        assert_eq!(items[0].coordinates, Some(Coordinates { latitude: 18.50, longitude: 73.80 }));
        assert_eq!(items[1].coordinates, Some(Coordinates { latitude: 19.11, longitude: 72.86 }));
        assert_eq!(items[2].coordinates, None);
        assert!(!items[2].is_active);
    }
}
