//! Roster-only analyses: facility head counts, state/designation breakdowns
//! and phone contact coverage.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{group_in_order, percentage};
use crate::model::staff::StaffRecord;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberBrief {
    pub id: Uuid,
    pub full_name: String,
    pub designation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRoster {
    pub facility: String,
    pub user_count: usize,
    pub users: Vec<MemberBrief>,
}

/// A sub-category's share of its parent group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateBreakdown {
    pub state: String,
    pub total_staff: usize,
    pub designations: Vec<Share>,
    pub top_designation: Option<TopCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignationBreakdown {
    pub designation: String,
    pub total_staff: usize,
    pub states: Vec<Share>,
    pub top_state: Option<TopCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffBrief {
    pub id: Uuid,
    pub full_name: String,
    pub facility: String,
    pub phone_number: String,
    pub lga: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateDesignationGroup {
    pub state: String,
    pub designation: String,
    pub count: usize,
    pub percentage_of_state: f64,
    pub staff: Vec<StaffBrief>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffContact {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub state: String,
    pub designation: String,
    pub facility: String,
    pub lga: String,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ContactFilter {
    /// Exact state match
    pub state: Option<String>,
    /// Exact designation match
    pub designation: Option<String>,
    /// Exact facility match
    pub facility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignationContacts {
    pub designation: String,
    pub count: usize,
    pub contacts: Vec<StaffContact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateContacts {
    pub state: String,
    pub total_staff_with_contacts: usize,
    pub designation_breakdown: Vec<DesignationContacts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageOverall {
    pub total_staff: usize,
    pub staff_with_contacts: usize,
    pub contact_coverage_percentage: f64,
    pub unique_states: usize,
    pub unique_designations: usize,
    pub unique_facilities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateCoverage {
    pub state: String,
    pub total_staff: usize,
    pub staff_with_contacts: usize,
    pub contact_percentage: f64,
    pub unique_designations: usize,
    pub unique_facilities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignationCoverage {
    pub designation: String,
    pub total_staff: usize,
    pub staff_with_contacts: usize,
    pub contact_percentage: f64,
    pub unique_states: usize,
    pub unique_facilities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveAnalysis {
    pub overall_summary: CoverageOverall,
    pub state_breakdown: Vec<StateCoverage>,
    pub designation_breakdown: Vec<DesignationCoverage>,
    pub generated_at: DateTime<Utc>,
}

/// Distinct non-empty facility names, ascending.
pub fn facilities(roster: &[StaffRecord]) -> Vec<String> {
    roster
        .iter()
        .filter(|s| !s.facility.is_empty())
        .map(|s| s.facility.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn facility_rosters(roster: &[StaffRecord]) -> Vec<FacilityRoster> {
    let mut by_facility: BTreeMap<&str, Vec<MemberBrief>> = BTreeMap::new();
    for s in roster.iter().filter(|s| !s.facility.is_empty()) {
        by_facility.entry(s.facility.as_str()).or_default().push(MemberBrief {
            id: s.id,
            full_name: s.full_name.clone(),
            designation: s.designation.clone(),
        });
    }

    by_facility
        .into_iter()
        .map(|(facility, users)| FacilityRoster {
            facility: facility.to_string(),
            user_count: users.len(),
            users,
        })
        .collect()
}

/// Sub-category shares sorted by count descending, plus the first-encountered
/// sub-category with the highest count.
fn shares<F>(members: &[&StaffRecord], key: F) -> (Vec<Share>, Option<TopCategory>)
where
    F: Fn(&StaffRecord) -> String,
{
    let total = members.len();
    let mut top: Option<TopCategory> = None;

    let mut out: Vec<Share> = group_in_order(members.iter().copied(), |s| key(s))
        .into_iter()
        .map(|(name, group)| {
            let count = group.len();
            if top.as_ref().is_none_or(|t| count > t.count) {
                top = Some(TopCategory {
                    name: name.clone(),
                    count,
                });
            }
            Share {
                name,
                count,
                percentage: percentage(count, total, 2),
            }
        })
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count));
    (out, top)
}

/// Breakdown of designations within each non-empty state, states ascending.
pub fn by_state(roster: &[StaffRecord]) -> Vec<StateBreakdown> {
    let mut states: Vec<StateBreakdown> =
        group_in_order(roster.iter().filter(|s| !s.state.is_empty()), |s| s.state.clone())
            .into_iter()
            .map(|(state, members)| {
                let (designations, top_designation) = shares(&members, |s| s.designation.clone());
                StateBreakdown {
                    state,
                    total_staff: members.len(),
                    designations,
                    top_designation,
                }
            })
            .collect();

    states.sort_by(|a, b| a.state.cmp(&b.state));
    states
}

/// Breakdown of states within each non-empty designation, largest first.
pub fn by_designation(roster: &[StaffRecord]) -> Vec<DesignationBreakdown> {
    let mut designations: Vec<DesignationBreakdown> = group_in_order(
        roster.iter().filter(|s| !s.designation.is_empty()),
        |s| s.designation.clone(),
    )
    .into_iter()
    .map(|(designation, members)| {
        let (states, top_state) = shares(&members, |s| s.state.clone());
        DesignationBreakdown {
            designation,
            total_staff: members.len(),
            states,
            top_state,
        }
    })
    .collect();

    designations.sort_by(|a, b| b.total_staff.cmp(&a.total_staff));
    designations
}

/// One group per (state, designation) pair, ordered by state then designation.
pub fn by_state_and_designation(roster: &[StaffRecord]) -> Vec<StateDesignationGroup> {
    let eligible: Vec<&StaffRecord> = roster
        .iter()
        .filter(|s| !s.state.is_empty() && !s.designation.is_empty())
        .collect();

    let mut state_totals: BTreeMap<&str, usize> = BTreeMap::new();
    for s in &eligible {
        *state_totals.entry(s.state.as_str()).or_insert(0) += 1;
    }

    let mut groups: Vec<StateDesignationGroup> = group_in_order(eligible.iter().copied(), |s| {
        (s.state.clone(), s.designation.clone())
    })
    .into_iter()
    .map(|((state, designation), members)| {
        let state_total = state_totals.get(state.as_str()).copied().unwrap_or(0);
        StateDesignationGroup {
            count: members.len(),
            percentage_of_state: percentage(members.len(), state_total, 2),
            staff: members
                .iter()
                .map(|s| StaffBrief {
                    id: s.id,
                    full_name: s.full_name.clone(),
                    facility: s.facility.clone(),
                    phone_number: s.phone_number.clone(),
                    lga: s.lga.clone(),
                })
                .collect(),
            state,
            designation,
        }
    })
    .collect();

    groups.sort_by(|a, b| (&a.state, &a.designation).cmp(&(&b.state, &b.designation)));
    groups
}

fn contact(s: &StaffRecord) -> StaffContact {
    StaffContact {
        id: s.id,
        full_name: s.full_name.clone(),
        phone_number: s.phone_number.clone(),
        state: s.state.clone(),
        designation: s.designation.clone(),
        facility: s.facility.clone(),
        lga: s.lga.clone(),
    }
}

fn matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref() {
        Some(f) if !f.is_empty() => f == value,
        _ => true,
    }
}

/// Staff with a phone number, optionally filtered, ordered by state then name.
pub fn staff_contacts(roster: &[StaffRecord], filter: &ContactFilter) -> Vec<StaffContact> {
    let mut contacts: Vec<StaffContact> = roster
        .iter()
        .filter(|s| s.has_contact())
        .filter(|s| matches(&filter.state, &s.state))
        .filter(|s| matches(&filter.designation, &s.designation))
        .filter(|s| matches(&filter.facility, &s.facility))
        .map(contact)
        .collect();

    contacts.sort_by(|a, b| (&a.state, &a.full_name).cmp(&(&b.state, &b.full_name)));
    contacts
}

pub fn contacts_by_designation_for_state(roster: &[StaffRecord], state: &str) -> StateContacts {
    let mut by_designation: BTreeMap<&str, Vec<StaffContact>> = BTreeMap::new();
    for s in roster.iter().filter(|s| s.state == state && s.has_contact()) {
        by_designation.entry(s.designation.as_str()).or_default().push(contact(s));
    }

    let designation_breakdown: Vec<DesignationContacts> = by_designation
        .into_iter()
        .map(|(designation, mut contacts)| {
            contacts.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            DesignationContacts {
                designation: designation.to_string(),
                count: contacts.len(),
                contacts,
            }
        })
        .collect();

    StateContacts {
        state: state.to_string(),
        total_staff_with_contacts: designation_breakdown.iter().map(|d| d.count).sum(),
        designation_breakdown,
    }
}

fn distinct<F>(members: &[&StaffRecord], field: F) -> usize
where
    F: Fn(&StaffRecord) -> &str,
{
    members.iter().map(|s| field(s)).collect::<HashSet<_>>().len()
}

/// Phone-number coverage overall and per state/designation.
pub fn contact_coverage(roster: &[StaffRecord], generated_at: DateTime<Utc>) -> ComprehensiveAnalysis {
    let all: Vec<&StaffRecord> = roster.iter().collect();
    let with_contacts = |members: &[&StaffRecord]| members.iter().filter(|s| s.has_contact()).count();

    let total_staff = all.len();
    let staff_with_contacts = with_contacts(&all);

    let mut state_breakdown: Vec<StateCoverage> = group_in_order(roster.iter(), |s| s.state.clone())
        .into_iter()
        .map(|(state, members)| {
            let contacts = with_contacts(&members);
            StateCoverage {
                state,
                total_staff: members.len(),
                staff_with_contacts: contacts,
                contact_percentage: percentage(contacts, members.len(), 2),
                unique_designations: distinct(&members, |s| &s.designation),
                unique_facilities: distinct(&members, |s| &s.facility),
            }
        })
        .collect();
    state_breakdown.sort_by(|a, b| b.total_staff.cmp(&a.total_staff));

    let mut designation_breakdown: Vec<DesignationCoverage> =
        group_in_order(roster.iter(), |s| s.designation.clone())
            .into_iter()
            .map(|(designation, members)| {
                let contacts = with_contacts(&members);
                DesignationCoverage {
                    designation,
                    total_staff: members.len(),
                    staff_with_contacts: contacts,
                    contact_percentage: percentage(contacts, members.len(), 2),
                    unique_states: distinct(&members, |s| &s.state),
                    unique_facilities: distinct(&members, |s| &s.facility),
                }
            })
            .collect();
    designation_breakdown.sort_by(|a, b| b.total_staff.cmp(&a.total_staff));

    ComprehensiveAnalysis {
        overall_summary: CoverageOverall {
            total_staff,
            staff_with_contacts,
            contact_coverage_percentage: percentage(staff_with_contacts, total_staff, 2),
            unique_states: distinct(&all, |s| &s.state),
            unique_designations: distinct(&all, |s| &s.designation),
            unique_facilities: distinct(&all, |s| &s.facility),
        },
        state_breakdown,
        designation_breakdown,
        generated_at,
    }
}
