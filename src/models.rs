//! Domain model for AMR routing schemas.
//!
//! A [`Schema`] is the aggregate document owned by a single user: the set of
//! workstations on the shop floor, the transportation costs between them,
//! and the fleet parameters of the autonomous mobile robots. The backend
//! never interprets these values; they are stored and transmitted whole.
//!
//! Workstations and transportation costs have set semantics keyed by
//! structural equality. Because their fields are `f64`, the collections are
//! kept as ordered sequences with a deduplication pass on mutation: adding a
//! value that is already present is a no-op.

use serde::{Deserialize, Serialize};

use crate::api::{SchemaId, UserId};

/// A workstation on the shop floor.
///
/// Value type: two instances are equal iff all four fields are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStation {
    /// Human-readable station name
    pub name: String,
    /// Demand the station places on the fleet
    pub demand: f64,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl WorkStation {
    pub fn new(name: impl Into<String>, demand: f64, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            demand,
            x,
            y,
        }
    }

    /// Position as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Cost of transporting goods between two workstations.
///
/// Stations are embedded by value, not by reference; equality is structural
/// over all three fields including the nested stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationCost {
    pub from_station: WorkStation,
    pub to_station: WorkStation,
    pub cost: f64,
}

impl TransportationCost {
    pub fn new(from_station: WorkStation, to_station: WorkStation, cost: f64) -> Self {
        Self {
            from_station,
            to_station,
            cost,
        }
    }
}

/// Fleet parameters for the autonomous mobile robots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmrParameters {
    /// Number of robots in the fleet
    pub quantity: u32,
    /// Load capacity per robot
    pub capacity: f64,
}

impl AmrParameters {
    pub fn new(quantity: u32, capacity: f64) -> Self {
        Self { quantity, capacity }
    }
}

/// Aggregate schema document describing one user's routing scenario.
///
/// `id` is `None` until the store assigns it at creation and immutable
/// afterwards; `user_id` is assigned at creation and never reassigned.
/// Mutation happens through the `add_*`/`set_*`/`remove_*` methods, which
/// preserve the duplicate-insert-is-a-no-op invariant of the collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SchemaDocument")]
pub struct Schema {
    /// Store-assigned identifier, unique and monotonically allocated
    pub id: Option<SchemaId>,
    /// Owning user
    pub user_id: UserId,
    workstations: Vec<WorkStation>,
    transportation_costs: Vec<TransportationCost>,
    amr_parameters: Option<AmrParameters>,
}

impl Schema {
    /// Create an empty schema: no workstations, no costs, no parameters.
    pub fn new(id: Option<SchemaId>, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            workstations: Vec::new(),
            transportation_costs: Vec::new(),
            amr_parameters: None,
        }
    }

    /// Add a workstation; a duplicate by value is a no-op.
    pub fn add_workstation(&mut self, station: WorkStation) {
        if !self.workstations.contains(&station) {
            self.workstations.push(station);
        }
    }

    /// Remove a workstation by value; absent values are ignored.
    pub fn remove_workstation(&mut self, station: &WorkStation) {
        self.workstations.retain(|s| s != station);
    }

    pub fn workstations(&self) -> &[WorkStation] {
        &self.workstations
    }

    /// Add a transportation cost; a duplicate by value is a no-op.
    pub fn set_transportation_cost(&mut self, cost: TransportationCost) {
        if !self.transportation_costs.contains(&cost) {
            self.transportation_costs.push(cost);
        }
    }

    /// Remove a transportation cost by value; absent values are ignored.
    pub fn remove_transportation_cost(&mut self, cost: &TransportationCost) {
        self.transportation_costs.retain(|c| c != cost);
    }

    pub fn transportation_costs(&self) -> &[TransportationCost] {
        &self.transportation_costs
    }

    pub fn set_amr_parameters(&mut self, parameters: AmrParameters) {
        self.amr_parameters = Some(parameters);
    }

    pub fn amr_parameters(&self) -> Option<&AmrParameters> {
        self.amr_parameters.as_ref()
    }
}

/// Membership comparison for small value collections with set semantics.
fn same_members<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().all(|item| b.contains(item))
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.user_id == other.user_id
            && same_members(&self.workstations, &other.workstations)
            && same_members(&self.transportation_costs, &other.transportation_costs)
            && self.amr_parameters == other.amr_parameters
    }
}

/// Raw persisted/wire form of a schema.
///
/// Deserialization funnels through this type so inbound documents carrying
/// duplicate workstations or costs collapse to set semantics.
#[derive(Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    id: Option<SchemaId>,
    user_id: UserId,
    workstations: Vec<WorkStation>,
    transportation_costs: Vec<TransportationCost>,
    amr_parameters: Option<AmrParameters>,
}

impl From<SchemaDocument> for Schema {
    fn from(doc: SchemaDocument) -> Self {
        let mut schema = Schema::new(doc.id, doc.user_id);
        for station in doc.workstations {
            schema.add_workstation(station);
        }
        for cost in doc.transportation_costs {
            schema.set_transportation_cost(cost);
        }
        if let Some(parameters) = doc.amr_parameters {
            schema.set_amr_parameters(parameters);
        }
        schema
    }
}
