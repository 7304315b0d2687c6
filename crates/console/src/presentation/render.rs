//! Plain-text rendering of session state.
//!
//! Raw data is decoded and filtered here, at render time. Nothing in this
//! module touches the session.

use simdeck_domain::{
    filter_scene, headline, Backend, CommandResult, CommandStatus, ConnectionStatus, EntryOrigin,
    ExclusionList, Inventory, InventoryKind, Timeline, TimelineEntry,
};

use crate::session::{SessionSnapshot, SessionState};

/// Shown in place of an empty inventory.
pub const EMPTY_INVENTORY: &str = "No objects found.";

/// Short tag identifying who produced an entry.
pub fn origin_marker(origin: EntryOrigin) -> &'static str {
    match origin {
        EntryOrigin::FromUser => "[you]",
        EntryOrigin::FromSimulation => "[sim]",
        EntryOrigin::FromAssistant => "[llm]",
    }
}

pub fn backend_label(backend: Backend) -> &'static str {
    match backend {
        Backend::Simulation => "Simulation",
        Backend::Assistant => "LLM",
    }
}

/// `Simulation: Connected | LLM: Loading...`, plus a busy marker.
pub fn status_line(snapshot: &SessionSnapshot) -> String {
    let part = |backend: Backend, status: ConnectionStatus| {
        format!("{}: {}", backend_label(backend), status.label())
    };
    let mut line = format!(
        "{} | {}",
        part(Backend::Simulation, snapshot.state.simulation),
        part(Backend::Assistant, snapshot.state.assistant)
    );
    if snapshot.busy {
        line.push_str(" | waiting for reply...");
    }
    line
}

/// One-line summary: marker, timestamp and the first segment of the message.
pub fn entry_line(index: usize, entry: &TimelineEntry) -> String {
    format!(
        "{:>3} {} {} - {}",
        index,
        origin_marker(entry.origin()),
        entry.timestamp(),
        headline(entry.message())
    )
}

/// Detail view of an entry.
///
/// Simulation entries are decoded and each section is shown only when the
/// decoded field is present. Other entries show their message as-is.
pub fn entry_details(entry: &TimelineEntry) -> String {
    let mut out = vec![format!(
        "{} {}",
        origin_marker(entry.origin()),
        entry.timestamp()
    )];

    if entry.origin() != EntryOrigin::FromSimulation {
        out.push(entry.message().to_string());
        return out.join("\n");
    }

    let result = CommandResult::decode(entry.message());
    if let Some(status) = result.status {
        let text = match status {
            CommandStatus::Success => "Success.",
            CommandStatus::Failure => "Failed.",
        };
        push_section(&mut out, "Status", [text]);
    }
    if let Some(action) = &result.action {
        push_section(&mut out, "Action", [action.as_str()]);
    }
    if let Some(response) = &result.response_text {
        push_section(&mut out, "Response", [response.as_str()]);
    }
    if !result.coordinates.is_empty() {
        push_section(
            &mut out,
            "Object Status (X, Y, Z)",
            result.coordinates.iter().map(String::as_str),
        );
    }
    if let Some(json) = &result.raw_json {
        push_section(&mut out, "JSON", [json.as_str()]);
    }
    out.join("\n")
}

fn push_section<'a>(out: &mut Vec<String>, title: &str, lines: impl IntoIterator<Item = &'a str>) {
    out.push(format!("{}:", title));
    out.extend(lines.into_iter().map(|line| format!("  {}", line)));
}

/// Names to show for an inventory, sorted. The scene list is filtered.
///
/// Sorting is code-point order, so capitalized names come first.
pub fn inventory_names(
    kind: InventoryKind,
    inventory: &Inventory,
    excluded: &ExclusionList,
) -> Vec<String> {
    let mut names = match kind {
        InventoryKind::Available => inventory.names().to_vec(),
        InventoryKind::Scene => filter_scene(inventory.names(), excluded),
    };
    names.sort();
    names
}

/// Inventory panel: a title and one name per line.
pub fn inventory_panel(kind: InventoryKind, state: &SessionState, excluded: &ExclusionList) -> String {
    let (title, inventory) = match kind {
        InventoryKind::Available => ("Available objects", &state.available),
        InventoryKind::Scene => ("Scene objects", &state.scene),
    };
    let names = inventory_names(kind, inventory, excluded);

    let mut out = vec![format!("{}:", title)];
    if names.is_empty() {
        out.push(format!("  {}", EMPTY_INVENTORY));
    } else {
        out.extend(names.iter().map(|name| format!("  {}", name)));
    }
    out.join("\n")
}

/// Every entry as a summary line, in the configured order.
pub fn history(timeline: &Timeline, newest_first: bool) -> Vec<String> {
    if newest_first {
        timeline
            .newest_first()
            .map(|(index, entry)| entry_line(index, entry))
            .collect()
    } else {
        timeline
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| entry_line(index, entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn sim_entry(message: &str) -> TimelineEntry {
        TimelineEntry::new(EntryOrigin::FromSimulation, message, at(10, 0, 1))
    }

    #[test]
    fn status_line_labels_each_backend() {
        let mut snapshot = SessionSnapshot::default();
        assert_eq!(
            status_line(&snapshot),
            "Simulation: Loading... | LLM: Loading..."
        );

        snapshot.state.simulation.mark_connected();
        snapshot.busy = true;
        assert_eq!(
            status_line(&snapshot),
            "Simulation: Connected | LLM: Loading... | waiting for reply..."
        );
    }

    #[test]
    fn entry_line_shows_first_segment_only() {
        let entry = sim_entry("Moved successfully:Engine panel removed|pos:1,2,3|rot:0,0,0");
        assert_eq!(
            entry_line(4, &entry),
            "  4 [sim] 10:00:01 - Moved successfully:Engine panel removed"
        );
    }

    #[test]
    fn details_show_only_present_sections() {
        let details = entry_details(&sim_entry(
            r#"Moved successfully:Engine panel removed|pos:1,2,3|rot:0,0,0|{"id":4}"#,
        ));
        assert_eq!(
            details,
            [
                "[sim] 10:00:01",
                "Status:",
                "  Success.",
                "Action:",
                "  Moved",
                "Response:",
                "  Engine panel removed",
                "Object Status (X, Y, Z):",
                "  pos:1,2,3",
                "  rot:0,0,0",
                "JSON:",
                r#"  {"id":4}"#,
            ]
            .join("\n")
        );

        let details = entry_details(&sim_entry("Failed to find object:Engine panel"));
        assert!(details.contains("  Failed."));
        assert!(!details.contains("Object Status"));
        assert!(!details.contains("JSON"));
    }

    #[test]
    fn plain_simulation_text_has_response_only() {
        let details = entry_details(&sim_entry("Hello operator"));
        assert_eq!(details, "[sim] 10:00:01\nResponse:\n  Hello operator");
    }

    #[test]
    fn non_simulation_entries_are_not_decoded() {
        let entry = TimelineEntry::new(EntryOrigin::FromUser, "move a|b", at(9, 0, 0));
        assert_eq!(entry_details(&entry), "[you] 09:00:00\nmove a|b");
    }

    #[test]
    fn scene_panel_is_filtered_and_available_is_not() {
        let state = SessionState {
            available: Inventory::parse("XR Rig, wrench"),
            scene: Inventory::parse("XR Origin, Engine Block"),
            ..SessionState::default()
        };
        let excluded = ExclusionList::new(["xr"]);

        assert_eq!(
            inventory_panel(InventoryKind::Scene, &state, &excluded),
            "Scene objects:\n  Engine Block"
        );
        assert_eq!(
            inventory_panel(InventoryKind::Available, &state, &excluded),
            "Available objects:\n  XR Rig\n  wrench"
        );
    }

    #[test]
    fn panels_are_sorted_but_inventories_keep_wire_order() {
        let state = SessionState {
            available: Inventory::parse("wrench, Spark Plug, bolt"),
            scene: Inventory::parse("wrench, XR Origin, Engine Block, Anvil"),
            ..SessionState::default()
        };
        let excluded = ExclusionList::new(["xr"]);

        assert_eq!(
            inventory_panel(InventoryKind::Available, &state, &excluded),
            "Available objects:\n  Spark Plug\n  bolt\n  wrench"
        );
        assert_eq!(
            inventory_panel(InventoryKind::Scene, &state, &excluded),
            "Scene objects:\n  Anvil\n  Engine Block\n  wrench"
        );
        assert_eq!(state.available.names(), &["wrench", "Spark Plug", "bolt"]);
    }

    #[test]
    fn empty_panel_says_so() {
        let state = SessionState::default();
        assert_eq!(
            inventory_panel(InventoryKind::Scene, &state, &ExclusionList::default()),
            "Scene objects:\n  No objects found."
        );
    }

    #[test]
    fn history_order_follows_config() {
        let mut timeline = Timeline::new();
        timeline.append(TimelineEntry::new(EntryOrigin::FromUser, "first", at(9, 0, 0)));
        timeline.append(TimelineEntry::new(EntryOrigin::FromAssistant, "second", at(9, 0, 0)));

        let newest = history(&timeline, true);
        assert!(newest[0].ends_with("second"));
        assert!(newest[1].ends_with("first"));

        let oldest = history(&timeline, false);
        assert!(oldest[0].ends_with("first"));
    }
}
