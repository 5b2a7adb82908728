//! Identifier-or-name lookup shared by every registry.

use onboard_state::{Application, DevOpsRecord, InfrastructureRecord};

/// A record addressable by application identifier or application name.
pub trait Keyed {
    fn id(&self) -> &str;
    fn application_name(&self) -> &str;
}

impl Keyed for Application {
    fn id(&self) -> &str {
        &self.id
    }

    fn application_name(&self) -> &str {
        &self.application_name
    }
}

impl Keyed for DevOpsRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn application_name(&self) -> &str {
        &self.application_name
    }
}

impl Keyed for InfrastructureRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn application_name(&self) -> &str {
        &self.application_name
    }
}

/// First record, in collection order, whose id or application name equals
/// `identifier`.
pub fn find<'a, T: Keyed>(records: &'a [T], identifier: &str) -> Option<&'a T> {
    records
        .iter()
        .find(|record| record.id() == identifier || record.application_name() == identifier)
}

/// First record belonging to `app`: its id equals the application's id or
/// its name equals the application's name.
pub fn find_owned_by<'a, T: Keyed>(records: &'a [T], app: &Application) -> Option<&'a T> {
    records
        .iter()
        .find(|record| record.id() == app.id || record.application_name() == app.application_name)
}
