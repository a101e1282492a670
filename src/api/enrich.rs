//! Tooltip enrichment for names typed into the sheet.
//!
//! Every field is fetched independently and concurrently. A field whose
//! lookup fails or finds nothing gets the placeholder tooltip; enrichment
//! never produces an error.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::lookup::{LookupKind, RulesService};
use crate::api::RulesEntry;
use crate::character::armor::{ArmorCatalog, ArmorCategory};
use crate::character::record::{CharacterRecord, EquipmentSlot, ListKind};
use crate::core::constants::PLACEHOLDER_DESCRIPTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipSource {
    Rules,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    /// The name that was looked up.
    pub query: String,
    pub title: String,
    pub body: Vec<String>,
    pub source: TooltipSource,
    /// The resolved entry, kept so armor facts can be learned from it.
    pub entry: Option<RulesEntry>,
}

impl Tooltip {
    pub fn placeholder(name: &str) -> Self {
        Self {
            query: name.trim().to_string(),
            title: name.trim().to_string(),
            body: vec![PLACEHOLDER_DESCRIPTION.to_string()],
            source: TooltipSource::Placeholder,
            entry: None,
        }
    }

    pub fn from_entry(query: &str, entry: RulesEntry) -> Self {
        let body = if entry.description.is_empty() {
            vec![PLACEHOLDER_DESCRIPTION.to_string()]
        } else {
            entry.description.clone()
        };
        Self {
            query: query.trim().to_string(),
            title: entry.to_string(),
            body,
            source: TooltipSource::Rules,
            entry: Some(entry),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == TooltipSource::Placeholder
    }

    /// Whether this tooltip was fetched for `name`.
    pub fn describes(&self, name: &str) -> bool {
        self.query.eq_ignore_ascii_case(name.trim())
    }
}

/// Where on the sheet a tooltip belongs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Slot(EquipmentSlot),
    Entry(ListKind, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipRequest {
    pub field: FieldKey,
    pub name: String,
    pub kind: LookupKind,
}

/// One request per non-empty equipment slot and list entry of a record.
pub fn record_requests(record: &CharacterRecord) -> Vec<TooltipRequest> {
    let mut requests: Vec<TooltipRequest> = record
        .equipment
        .iter()
        .filter(|(_, item)| !item.trim().is_empty())
        .map(|(slot, item)| TooltipRequest {
            field: FieldKey::Slot(*slot),
            name: item.clone(),
            kind: LookupKind::Item,
        })
        .collect();

    for list in ListKind::all() {
        for (position, entry) in record.list(list).iter().enumerate() {
            if entry.trim().is_empty() {
                continue;
            }
            requests.push(TooltipRequest {
                field: FieldKey::Entry(list, position),
                name: entry.clone(),
                kind: LookupKind::for_list(list),
            });
        }
    }
    requests
}

pub async fn enrich(service: &RulesService, name: &str, kind: LookupKind) -> Tooltip {
    match service.resolve(name, kind).await {
        Some(entry) => Tooltip::from_entry(name, entry),
        None => {
            debug!(name, %kind, "no rules entry, using placeholder");
            Tooltip::placeholder(name)
        }
    }
}

/// Resolve all requests concurrently, preserving request order.
pub async fn enrich_fields(
    service: &RulesService,
    requests: Vec<TooltipRequest>,
) -> Vec<(FieldKey, Tooltip)> {
    let lookups = requests.into_iter().map(|request| async move {
        let tooltip = enrich(service, &request.name, request.kind).await;
        (request.field, tooltip)
    });
    join_all(lookups).await
}

/// Built-in armor plus whatever the rules source knows about unfamiliar
/// items in the armor and off-hand slots.
pub async fn armor_catalog_for(service: &RulesService, record: &CharacterRecord) -> ArmorCatalog {
    let mut catalog = ArmorCatalog::builtin();
    let unknown = [EquipmentSlot::Armor, EquipmentSlot::OffHand]
        .into_iter()
        .filter_map(|slot| record.equipped(slot))
        .filter(|item| catalog.get(item).is_none())
        .map(|item| enrich(service, item, LookupKind::Item));
    let tooltips = join_all(unknown).await;
    learn_armor(&mut catalog, &tooltips);
    catalog
}

/// Teach the catalog any armor facts carried by resolved tooltips. Returns
/// how many profiles were learned.
pub fn learn_armor<'a>(
    catalog: &mut ArmorCatalog,
    tooltips: impl IntoIterator<Item = &'a Tooltip>,
) -> usize {
    let mut learned = 0;
    for entry in tooltips.into_iter().filter_map(|t| t.entry.as_ref()) {
        let Some(profile) = entry.armor else {
            continue;
        };
        if catalog.get(&entry.name) == Some(profile) {
            continue;
        }
        catalog.learn(&entry.name, profile);
        if profile.category != ArmorCategory::Shield {
            catalog.learn(&entry.index.replace('-', " "), profile);
        }
        learned += 1;
    }
    learned
}

#[derive(Debug)]
pub enum EnrichMessage {
    Tooltips(Vec<(FieldKey, Tooltip)>),
}

/// Runs enrichment batches in the background for the editor.
///
/// Each batch is tagged with the id it was started under so results from a
/// batch that was superseded can be told apart from the current one.
#[derive(Clone)]
pub struct EnrichmentService {
    service: Arc<RulesService>,
    tx: mpsc::UnboundedSender<(EnrichMessage, u64)>,
}

impl EnrichmentService {
    pub fn new(service: Arc<RulesService>) -> (Self, mpsc::UnboundedReceiver<(EnrichMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { service, tx }, rx)
    }

    pub fn rules(&self) -> &Arc<RulesService> {
        &self.service
    }

    pub fn spawn_batch(
        &self,
        requests: Vec<TooltipRequest>,
        cancel_token: CancellationToken,
        batch_id: u64,
    ) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(batch_id, "enrichment batch cancelled");
                }
                tooltips = enrich_fields(&service, requests) => {
                    let _ = tx.send((EnrichMessage::Tooltips(tooltips), batch_id));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::lookup::tests::StubSource;
    use crate::api::{ArmorClassInfo, RulesResource};
    use crate::character::armor::{derive_armor_class, ArmorProfile, DexRule};

    #[tokio::test]
    async fn missing_entries_get_placeholder() {
        let service = RulesService::new(Arc::new(
            StubSource::default().with_resource("equipment", "club", "Club"),
        ));
        let mut record = CharacterRecord::new("Tess");
        record.equip(EquipmentSlot::MainHand, "Club");
        record.push_entry(ListKind::Inventory, "Lucky pebble");

        let tooltips = enrich_fields(&service, record_requests(&record)).await;
        assert_eq!(tooltips.len(), 2);
        assert_eq!(tooltips[0].0, FieldKey::Slot(EquipmentSlot::MainHand));
        assert_eq!(tooltips[0].1.source, TooltipSource::Rules);
        assert_eq!(tooltips[0].1.body, vec!["Club description."]);
        assert_eq!(tooltips[1].0, FieldKey::Entry(ListKind::Inventory, 0));
        assert!(tooltips[1].1.is_placeholder());
        assert_eq!(tooltips[1].1.body, vec![PLACEHOLDER_DESCRIPTION]);
    }

    #[tokio::test]
    async fn offline_enrichment_is_all_placeholders() {
        let service = RulesService::offline();
        let tooltip = enrich(&service, "Fireball", LookupKind::Spell).await;
        assert!(tooltip.is_placeholder());
        assert_eq!(tooltip.title, "Fireball");
    }

    #[test]
    fn requests_skip_blank_entries_and_map_kinds() {
        let mut record = CharacterRecord::new("Tess");
        record.equip(EquipmentSlot::Armor, "Leather Armor");
        record.push_entry(ListKind::Spells, "Aid");
        record.push_entry(ListKind::Feats, "Alert");
        record.spells.push("   ".to_string());

        let requests = record_requests(&record);
        let kinds: Vec<_> = requests.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![LookupKind::Item, LookupKind::Feat, LookupKind::Spell]);
    }

    #[test]
    fn armor_entries_extend_catalog() {
        let mut catalog = ArmorCatalog::builtin();
        let before = catalog.len();
        let profile = ArmorProfile {
            category: ArmorCategory::Light,
            base: 12,
            dex: DexRule::Full,
        };
        let tooltip = Tooltip::from_entry(
            "Elven Chain",
            RulesEntry {
                index: "elven-chain".to_string(),
                name: "Elven Chain".to_string(),
                category: "magic-items".to_string(),
                summary: None,
                description: Vec::new(),
                armor: Some(profile),
            },
        );
        assert_eq!(learn_armor(&mut catalog, [&tooltip]), 1);
        assert_eq!(catalog.get("elven chain"), Some(profile));
        assert!(catalog.len() > before);
        // Learning the same facts twice is a no-op.
        assert_eq!(learn_armor(&mut catalog, [&tooltip]), 0);
    }

    #[tokio::test]
    async fn catalog_learns_unfamiliar_worn_armor() {
        let mut stub = StubSource::default();
        stub.resources.insert(
            ("equipment".to_string(), "elven-chain".to_string()),
            RulesResource {
                index: "elven-chain".to_string(),
                name: "Elven Chain".to_string(),
                desc: Vec::new(),
                higher_level: Vec::new(),
                equipment_category: None,
                armor_category: Some("Light".to_string()),
                armor_class: Some(ArmorClassInfo {
                    base: 13,
                    dex_bonus: true,
                    max_bonus: None,
                }),
                rarity: None,
                level: None,
                school: None,
            },
        );
        let stub = Arc::new(stub);
        let service = RulesService::new(stub.clone());

        let mut record = CharacterRecord::new("Tess");
        record.abilities.dexterity = 14;
        record.equip(EquipmentSlot::Armor, "Elven Chain");
        record.equip(EquipmentSlot::OffHand, "Shield");
        let catalog = armor_catalog_for(&service, &record).await;

        assert_eq!(derive_armor_class(&record, &catalog).total, 17);
        assert_eq!(stub.request_log(), vec!["equipment/elven-chain"]);

        let offline = armor_catalog_for(&RulesService::offline(), &record).await;
        assert_eq!(derive_armor_class(&record, &offline).total, 14);
    }

    #[tokio::test]
    async fn cancelled_batches_send_nothing() {
        let service = Arc::new(RulesService::offline());
        let (enricher, mut rx) = EnrichmentService::new(service);
        let token = CancellationToken::new();
        token.cancel();
        enricher.spawn_batch(Vec::new(), token, 1);

        let live = CancellationToken::new();
        enricher.spawn_batch(Vec::new(), live, 2);
        let (_, id) = rx.recv().await.unwrap();
        assert_eq!(id, 2);
    }
}
