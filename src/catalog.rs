//! Transit catalog: destinations, the bus services that reach them, and the
//! ordered stops of each service.
//!
//! The catalog is a read-only lookup. [`StaticCatalog`] ships the Derby
//! schedule as static tables; a live feed can implement [`TransitCatalog`]
//! instead.

/// One scheduled bus departure serving a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusService {
    /// Route number shown on the bus, e.g. "1A".
    pub service_id: String,
    pub operator: String,
    /// Stop the rider boards at.
    pub origin_stop: String,
    /// Headsign shown on the bus.
    pub destination_label: String,
    /// Departure time as printed on the timetable ("15:30").
    pub departure_time: String,
}

/// A stop at a fixed position on a service's route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub name: String,
    /// 0-based position within the route.
    pub ordinal: usize,
}

/// Read-only schedule lookup queried by the state machine.
pub trait TransitCatalog: Send + Sync {
    /// Destination keys in declaration order. Order decides resolver ties.
    fn destination_keys(&self) -> Vec<&str>;

    /// Services for a destination key, first listed first. Empty if unknown.
    fn services_for(&self, destination_key: &str) -> Vec<BusService>;

    /// Ordered stops of a service. Empty if unknown.
    fn stops_for(&self, service_id: &str) -> Vec<RouteStop>;
}

/// Static timetable row.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    pub service_id: &'static str,
    pub operator: &'static str,
    pub origin_stop: &'static str,
    pub destination_label: &'static str,
    pub departure_time: &'static str,
}

/// Static destination with its services.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationEntry {
    /// Lowercase canonical key.
    pub key: &'static str,
    pub services: &'static [ServiceEntry],
}

/// Static route: service id and stop names in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub service_id: &'static str,
    pub stops: &'static [&'static str],
}

const fn service(
    service_id: &'static str,
    operator: &'static str,
    destination_label: &'static str,
    departure_time: &'static str,
) -> ServiceEntry {
    ServiceEntry {
        service_id,
        operator,
        origin_stop: "Morledge",
        destination_label,
        departure_time,
    }
}

/// Derby destinations, in the order the selection prompt offers them.
pub const DERBY_DESTINATIONS: &[DestinationEntry] = &[
    DestinationEntry {
        key: "pride park",
        services: &[
            service("1A", "Arriva", "Pride Park", "15:30"),
            service("1C", "Arriva", "Pride Park", "15:40"),
        ],
    },
    DestinationEntry {
        key: "derby station",
        services: &[service("i4", "Trentbarton", "Derby Station", "15:35")],
    },
    DestinationEntry {
        key: "city centre",
        services: &[
            service("1C", "Arriva", "City Centre", "15:28"),
            service("6.1", "Arriva", "City Centre", "15:33"),
        ],
    },
    DestinationEntry {
        key: "morledge",
        services: &[service("V1", "Trentbarton", "Morledge", "15:32")],
    },
    DestinationEntry {
        key: "allestree",
        services: &[service("6.1", "Arriva", "Allestree", "15:38")],
    },
    DestinationEntry {
        key: "alvaston",
        services: &[service("1A", "Arriva", "Alvaston", "15:34")],
    },
    DestinationEntry {
        key: "chellaston",
        services: &[service("2A", "Arriva", "Chellaston", "15:37")],
    },
];

/// Derby routes keyed by service id.
pub const DERBY_ROUTES: &[RouteEntry] = &[
    RouteEntry {
        service_id: "1A",
        stops: &["Morledge", "Derwent Street", "Pride Park", "Alvaston"],
    },
    RouteEntry {
        service_id: "1C",
        stops: &["Morledge", "Victoria Street", "City Centre", "Pride Park"],
    },
    RouteEntry {
        service_id: "i4",
        stops: &["Morledge", "Midland Road", "Derby Station", "Osmaston Road"],
    },
    RouteEntry {
        service_id: "V1",
        stops: &["Morledge", "Albert Street", "City Centre", "Burton Road"],
    },
    RouteEntry {
        service_id: "6.1",
        stops: &["Morledge", "Victoria Street", "City Centre", "Allestree"],
    },
    RouteEntry {
        service_id: "2A",
        stops: &["Morledge", "London Road", "Osmaston Road", "Chellaston"],
    },
];

/// Catalog backed by static tables.
#[derive(Debug, Clone, Copy)]
pub struct StaticCatalog {
    destinations: &'static [DestinationEntry],
    routes: &'static [RouteEntry],
}

impl StaticCatalog {
    pub const fn new(
        destinations: &'static [DestinationEntry],
        routes: &'static [RouteEntry],
    ) -> Self {
        Self {
            destinations,
            routes,
        }
    }

    /// The bundled Derby schedule.
    pub const fn derby() -> Self {
        Self::new(DERBY_DESTINATIONS, DERBY_ROUTES)
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::derby()
    }
}

impl TransitCatalog for StaticCatalog {
    fn destination_keys(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.key).collect()
    }

    fn services_for(&self, destination_key: &str) -> Vec<BusService> {
        self.destinations
            .iter()
            .find(|d| d.key == destination_key)
            .map(|d| {
                d.services
                    .iter()
                    .map(|s| BusService {
                        service_id: s.service_id.to_string(),
                        operator: s.operator.to_string(),
                        origin_stop: s.origin_stop.to_string(),
                        destination_label: s.destination_label.to_string(),
                        departure_time: s.departure_time.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn stops_for(&self, service_id: &str) -> Vec<RouteStop> {
        self.routes
            .iter()
            .find(|r| r.service_id == service_id)
            .map(|r| {
                r.stops
                    .iter()
                    .enumerate()
                    .map(|(ordinal, name)| RouteStop {
                        name: (*name).to_string(),
                        ordinal,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Capitalize each word of a destination key ("pride park" → "Pride Park").
pub fn title_case(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
