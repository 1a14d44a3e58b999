//! Derivation of [`Room`] occupancy out of its [`Reservation`]s and
//! [`MaintenanceIssue`]s.
//!
//! [`Room`]s have no stored status. At any instant exactly one [`Status`]
//! applies, with precedence `Maintenance > Occupied > Available`:
//! - [`Status::Maintenance`] if any [`MaintenanceIssue`] is active, whatever
//!   reservations overlap it;
//! - [`Status::Occupied`] if a [`Pending`] or [`CheckedIn`] [`Reservation`]
//!   covers the instant;
//! - [`Status::Available`] otherwise.
//!
//! Both windows are half-open: they include their beginning and exclude
//! their end.
//!
//! Everything here is pure and works over the already selected snapshots.
//!
//! [`CheckedIn`]: reservation::Status::CheckedIn
//! [`Pending`]: reservation::Status::Pending
//! [`Reservation`]: crate::domain::Reservation

use std::collections::{HashMap, HashSet};

use common::{define_kind, unit, Date, DateTime, DateTimeOf, Days, TimeOfDay};

use crate::{
    domain::{customer, reservation, room, MaintenanceIssue, Room},
    read::Stay,
};

/// Time of a day the calendar grid represents the whole day with.
pub const CALENDAR_CHECK_TIME: TimeOfDay = TimeOfDay::hm(16, 0);

/// Time of the current day a single [`Room`] status is reported as of.
///
/// Only affects the reported timestamp, the status itself is resolved at the
/// current instant.
pub const STATUS_AS_OF_TIME: TimeOfDay = TimeOfDay::hm(19, 0);

define_kind! {
    #[doc = "Status of a [`Room`] at some instant."]
    enum Status {
        #[doc = "Free for booking."]
        Available = 1,

        #[doc = "Held by a pending or checked-in reservation."]
        Occupied = 2,

        #[doc = "Out of service because of an active maintenance issue."]
        Maintenance = 3,
    }
}

/// Outcome of [`resolve`]ing a [`Room`] at some instant.
#[derive(Clone, Copy, Debug)]
pub enum Resolution<'s> {
    /// [`Status::Available`].
    Available,

    /// [`Status::Occupied`] by the provided [`Stay`].
    Occupied(&'s Stay),

    /// [`Status::Maintenance`].
    Maintenance,
}

impl<'s> Resolution<'s> {
    /// Returns the [`Status`] of this [`Resolution`].
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Available => Status::Available,
            Self::Occupied(_) => Status::Occupied,
            Self::Maintenance => Status::Maintenance,
        }
    }

    /// Returns the [`Stay`] occupying the [`Room`], if any.
    #[must_use]
    pub fn stay(&self) -> Option<&'s Stay> {
        match self {
            Self::Occupied(stay) => Some(stay),
            Self::Available | Self::Maintenance => None,
        }
    }
}

/// Resolves the [`Status`] of a single [`Room`] at the provided instant.
///
/// All the provided [`Stay`]s and [`MaintenanceIssue`]s are expected to
/// belong to the same [`Room`].
pub fn resolve<'s, 'i>(
    stays: impl IntoIterator<Item = &'s Stay>,
    issues: impl IntoIterator<Item = &'i MaintenanceIssue>,
    at: DateTime,
) -> Resolution<'s> {
    if issues.into_iter().any(|i| i.is_active_at(at)) {
        return Resolution::Maintenance;
    }
    stays
        .into_iter()
        .find(|s| s.reservation.occupies(at))
        .map_or(Resolution::Available, Resolution::Occupied)
}

/// Single day of a [`RoomCalendar`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarDay {
    /// [`Date`] of this day.
    pub date: Date,

    /// [`Status`] of the [`Room`] on this day.
    pub status: Status,

    /// ID of the [`Reservation`] occupying the [`Room`], if any.
    ///
    /// [`Reservation`]: crate::domain::Reservation
    pub reservation_id: Option<reservation::Id>,

    /// [`customer::FullName`] of the guest occupying the [`Room`], if any.
    pub guest_name: Option<customer::FullName>,
}

/// Day-by-day [`Status`]es of a single [`Room`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoomCalendar {
    /// ID of the [`Room`].
    pub room_id: room::Id,

    /// [`room::Number`] of the [`Room`].
    pub room_number: room::Number,

    /// [`CalendarDay`]s in the requested order.
    pub days: Vec<CalendarDay>,
}

/// Builds a [`RoomCalendar`] for each of the provided [`Room`]s over the
/// provided [`Days`].
///
/// Every day is represented by its state at the `check_time` of that day,
/// not by any overlap with the whole day. [`Stay`]s and [`MaintenanceIssue`]s
/// of [`Room`]s not in the list are ignored.
#[must_use]
pub fn calendar(
    rooms: &[Room],
    stays: &[Stay],
    issues: &[MaintenanceIssue],
    days: Days,
    check_time: TimeOfDay,
) -> Vec<RoomCalendar> {
    let stays = group_by_room(stays, |s| s.reservation.room_id);
    let issues = group_by_room(issues, |i| i.room_id);

    rooms
        .iter()
        .map(|room| {
            let stays =
                stays.get(&room.id).map(Vec::as_slice).unwrap_or_default();
            let issues =
                issues.get(&room.id).map(Vec::as_slice).unwrap_or_default();

            let days = days
                .into_iter()
                .map(|date| {
                    let resolution = resolve(
                        stays.iter().copied(),
                        issues.iter().copied(),
                        date.at(check_time),
                    );
                    let stay = resolution.stay();
                    CalendarDay {
                        date,
                        status: resolution.status(),
                        reservation_id: stay.map(|s| s.reservation.id),
                        guest_name: stay.map(|s| s.guest_name.clone()),
                    }
                })
                .collect();

            RoomCalendar {
                room_id: room.id,
                room_number: room.number.clone(),
                days,
            }
        })
        .collect()
}

/// Groups the provided `items` by their [`Room`] ID.
fn group_by_room<T>(
    items: &[T],
    room_id: impl Fn(&T) -> room::Id,
) -> HashMap<room::Id, Vec<&T>> {
    let mut groups = HashMap::<_, Vec<_>>::new();
    for item in items {
        groups.entry(room_id(item)).or_default().push(item);
    }
    groups
}

/// Counts of [`Room`]s per [`Status`] at some instant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Summary {
    /// Total number of [`Room`]s.
    pub total_rooms: u32,

    /// Number of [`Status::Available`] [`Room`]s.
    pub available_rooms: u32,

    /// Number of [`Status::Occupied`] [`Room`]s.
    pub occupied_rooms: u32,

    /// Number of [`Status::Maintenance`] [`Room`]s.
    pub rooms_under_maintenance: u32,
}

impl Summary {
    /// Creates a new [`Summary`] deriving the available [`Room`]s from the
    /// rest.
    ///
    /// The number of available [`Room`]s never goes below zero, even if the
    /// provided counts are inconsistent.
    #[must_use]
    pub fn new(
        total_rooms: u32,
        occupied_rooms: u32,
        rooms_under_maintenance: u32,
    ) -> Self {
        Self {
            total_rooms,
            available_rooms: total_rooms
                .saturating_sub(occupied_rooms)
                .saturating_sub(rooms_under_maintenance),
            occupied_rooms,
            rooms_under_maintenance,
        }
    }
}

/// Summarizes [`Status`]es of the provided [`Room`]s at the `now` instant.
///
/// A [`Room`] under maintenance is never counted as occupied.
#[must_use]
pub fn summarize(
    rooms: &[Room],
    stays: &[Stay],
    issues: &[MaintenanceIssue],
    now: DateTime,
) -> Summary {
    let under_maintenance = issues
        .iter()
        .filter(|i| i.is_active_at(now))
        .map(|i| i.room_id)
        .collect::<HashSet<_>>();
    let occupied = stays
        .iter()
        .filter(|s| s.reservation.occupies(now))
        .map(|s| s.reservation.room_id)
        .filter(|id| !under_maintenance.contains(id))
        .collect::<HashSet<_>>();

    let listed = |ids: &HashSet<room::Id>| {
        rooms.iter().filter(|r| ids.contains(&r.id)).count()
    };
    Summary::new(
        saturating_u32(rooms.len()),
        saturating_u32(listed(&occupied)),
        saturating_u32(listed(&under_maintenance)),
    )
}

/// Converts the provided count into [`u32`], saturating on overflow.
fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Returns the [`DateTime`] a single [`Room`] status resolved at `now` is
/// reported as of.
#[must_use]
pub fn status_as_of(now: DateTime) -> DateTimeOf<unit::AsOf> {
    now.date().at(STATUS_AS_OF_TIME)
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Date, DateTime, Days, Money};

    use crate::{
        domain::{
            customer, maintenance_issue::spec::issue,
            reservation::{self, spec::reservation},
            room, MaintenanceIssue, Room,
        },
        read::Stay,
    };

    use super::{
        calendar, resolve, status_as_of, summarize, Resolution, Status,
        Summary, CALENDAR_CHECK_TIME,
    };

    static NO_STAYS: [Stay; 0] = [];
    static NO_ISSUES: [MaintenanceIssue; 0] = [];

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn room(number: &str) -> Room {
        Room {
            id: room::Id::new(),
            number: room::Number::new(number).unwrap(),
            kind: room::Kind::Double,
            floor: 1,
            capacity: room::Capacity::new(2).unwrap(),
            price: Money::from_str("100USD").unwrap(),
            description: None,
            amenities: vec![],
            created_at: at("2025-01-01T00:00:00Z").coerce(),
        }
    }

    fn stay(
        room_id: room::Id,
        start: &str,
        end: &str,
        status: reservation::Status,
    ) -> Stay {
        Stay {
            reservation: reservation(room_id, start, end, status),
            guest_name: customer::FullName::new(
                &customer::Name::new("Ada").unwrap(),
                &customer::Name::new("Lovelace").unwrap(),
            ),
        }
    }

    fn pending(room_id: room::Id, start: &str, end: &str) -> Stay {
        stay(room_id, start, end, reservation::Status::Pending)
    }

    #[test]
    fn maintenance_takes_precedence_over_occupancy() {
        let id = room::Id::new();
        let stays = [pending(id, "2025-06-01T00:00:00Z", "2025-06-05T00:00:00Z")];
        let issues = [issue(id, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z")];

        let r = resolve(&stays, &issues, at("2025-06-02T12:00:00Z"));
        assert_eq!(r.status(), Status::Maintenance);
        assert!(r.stay().is_none());

        let r = resolve(&stays, &issues, at("2025-06-03T12:00:00Z"));
        assert_eq!(r.status(), Status::Occupied);
    }

    #[test]
    fn occupied_exposes_stay() {
        let id = room::Id::new();
        let stays = [pending(id, "2025-06-01T00:00:00Z", "2025-06-05T00:00:00Z")];

        let r = resolve(&stays, &NO_ISSUES, at("2025-06-02T12:00:00Z"));
        let Resolution::Occupied(s) = r else {
            panic!("expected `Occupied`, got: {r:?}");
        };
        assert_eq!(s.reservation.id, stays[0].reservation.id);
        assert_eq!(s.guest_name.to_string(), "Ada Lovelace");
    }

    #[test]
    fn ignores_non_occupying_reservations() {
        let id = room::Id::new();
        let stays = [
            stay(
                id,
                "2025-06-01T00:00:00Z",
                "2025-06-05T00:00:00Z",
                reservation::Status::Cancelled,
            ),
            stay(
                id,
                "2025-06-01T00:00:00Z",
                "2025-06-05T00:00:00Z",
                reservation::Status::Completed,
            ),
        ];

        let r = resolve(&stays, &NO_ISSUES, at("2025-06-02T12:00:00Z"));
        assert_eq!(r.status(), Status::Available);
    }

    #[test]
    fn checked_in_occupies() {
        let id = room::Id::new();
        let stays = [stay(
            id,
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
            reservation::Status::CheckedIn,
        )];

        let r = resolve(&stays, &NO_ISSUES, at("2025-06-04T23:59:59Z"));
        assert_eq!(r.status(), Status::Occupied);
    }

    #[test]
    fn reservation_window_is_half_open() {
        let id = room::Id::new();
        let stays = [pending(id, "2025-06-01T16:00:00Z", "2025-06-03T16:00:00Z")];

        let start = resolve(&stays, &NO_ISSUES, at("2025-06-01T16:00:00Z"));
        assert_eq!(start.status(), Status::Occupied);

        let end = resolve(&stays, &NO_ISSUES, at("2025-06-03T16:00:00Z"));
        assert_eq!(end.status(), Status::Available);
    }

    #[test]
    fn maintenance_window_is_half_open() {
        let id = room::Id::new();
        let issues = [issue(id, "2025-06-01T16:00:00Z", "2025-06-03T16:00:00Z")];

        let created = resolve(&NO_STAYS, &issues, at("2025-06-01T16:00:00Z"));
        assert_eq!(created.status(), Status::Maintenance);

        let completed = resolve(&NO_STAYS, &issues, at("2025-06-03T16:00:00Z"));
        assert_eq!(completed.status(), Status::Available);
    }

    #[test]
    fn always_resolves_single_status() {
        let id = room::Id::new();
        let stays = [pending(id, "2025-06-02T00:00:00Z", "2025-06-04T00:00:00Z")];
        let issues = [issue(id, "2025-06-03T00:00:00Z", "2025-06-05T00:00:00Z")];

        let statuses = [
            "2025-06-01T12:00:00Z",
            "2025-06-02T12:00:00Z",
            "2025-06-03T12:00:00Z",
            "2025-06-04T12:00:00Z",
            "2025-06-05T12:00:00Z",
        ]
        .map(|t| resolve(&stays, &issues, at(t)).status());

        assert_eq!(
            statuses,
            [
                Status::Available,
                Status::Occupied,
                Status::Maintenance,
                Status::Maintenance,
                Status::Available,
            ],
        );
    }

    #[test]
    fn calendar_has_entry_per_room_and_day() {
        let rooms = [room("101"), room("102")];
        let days = Days::new(date("2025-06-01"), date("2025-06-03"));

        let grid = calendar(&rooms, &[], &[], days, CALENDAR_CHECK_TIME);

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].room_number.to_string(), "101");
        assert_eq!(grid[1].room_number.to_string(), "102");
        for room in &grid {
            assert_eq!(
                room.days
                    .iter()
                    .map(|d| d.date.to_string())
                    .collect::<Vec<_>>(),
                ["2025-06-01", "2025-06-02"],
            );
            assert!(room.days.iter().all(|d| d.status == Status::Available));
        }
    }

    #[test]
    fn calendar_samples_each_day_at_check_time() {
        let rooms = [room("101"), room("102")];
        let stays = [
            // Leaves before 16:00 of the second day.
            pending(rooms[0].id, "2025-06-01T12:00:00Z", "2025-06-02T12:00:00Z"),
            // Arrives exactly at 16:00 of the second day.
            pending(rooms[1].id, "2025-06-02T16:00:00Z", "2025-06-04T11:00:00Z"),
        ];
        let days = Days::new(date("2025-06-01"), date("2025-06-03"));

        let grid = calendar(&rooms, &stays, &[], days, CALENDAR_CHECK_TIME);

        let first = &grid[0].days;
        assert_eq!(first[0].status, Status::Occupied);
        assert_eq!(first[0].reservation_id, Some(stays[0].reservation.id));
        assert_eq!(
            first[0].guest_name.as_ref().map(ToString::to_string),
            Some("Ada Lovelace".into()),
        );
        assert_eq!(first[1].status, Status::Available);
        assert_eq!(first[1].reservation_id, None);
        assert_eq!(first[1].guest_name, None);

        let second = &grid[1].days;
        assert_eq!(second[0].status, Status::Available);
        assert_eq!(second[1].status, Status::Occupied);
        assert_eq!(second[1].reservation_id, Some(stays[1].reservation.id));
    }

    #[test]
    fn calendar_reports_maintenance_without_guest() {
        let rooms = [room("101")];
        let stays =
            [pending(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-05T00:00:00Z")];
        let issues =
            [issue(rooms[0].id, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z")];
        let days = Days::inclusive(date("2025-06-01"), date("2025-06-03")).unwrap();

        let grid = calendar(&rooms, &stays, &issues, days, CALENDAR_CHECK_TIME);

        let days = &grid[0].days;
        assert_eq!(
            days.iter().map(|d| d.status).collect::<Vec<_>>(),
            [Status::Occupied, Status::Maintenance, Status::Occupied],
        );
        assert_eq!(days[1].reservation_id, None);
        assert_eq!(days[1].guest_name, None);
    }

    #[test]
    fn calendar_ignores_unlisted_rooms() {
        let listed = room("101");
        let stays = [pending(
            room::Id::new(),
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
        )];
        let days = Days::new(date("2025-06-01"), date("2025-06-02"));

        let grid = calendar(
            &[listed],
            &stays,
            &[],
            days,
            CALENDAR_CHECK_TIME,
        );

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].days[0].status, Status::Available);
    }

    #[test]
    fn calendar_is_empty_for_empty_range() {
        let rooms = [room("101")];
        let days = Days::new(date("2025-06-03"), date("2025-06-03"));

        let grid = calendar(&rooms, &[], &[], days, CALENDAR_CHECK_TIME);

        assert_eq!(grid.len(), 1);
        assert!(grid[0].days.is_empty());
    }

    #[test]
    fn summarizes_dashboard() {
        let rooms = (101..=110).map(|n| room(&n.to_string())).collect::<Vec<_>>();
        let now = at("2025-06-02T12:00:00Z");
        let issues = [
            issue(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-04T00:00:00Z"),
            issue(rooms[1].id, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z"),
            // Already fixed.
            issue(rooms[2].id, "2025-05-01T00:00:00Z", "2025-05-03T00:00:00Z"),
        ];
        let stays = [
            pending(rooms[3].id, "2025-06-01T00:00:00Z", "2025-06-04T00:00:00Z"),
            pending(rooms[4].id, "2025-06-02T12:00:00Z", "2025-06-04T00:00:00Z"),
            stay(
                rooms[5].id,
                "2025-06-01T00:00:00Z",
                "2025-06-04T00:00:00Z",
                reservation::Status::CheckedIn,
            ),
            // Ends right now.
            pending(rooms[6].id, "2025-06-01T00:00:00Z", "2025-06-02T12:00:00Z"),
            stay(
                rooms[7].id,
                "2025-06-01T00:00:00Z",
                "2025-06-04T00:00:00Z",
                reservation::Status::Cancelled,
            ),
        ];

        assert_eq!(
            summarize(&rooms, &stays, &issues, now),
            Summary {
                total_rooms: 10,
                available_rooms: 5,
                occupied_rooms: 3,
                rooms_under_maintenance: 2,
            },
        );
    }

    #[test]
    fn room_under_maintenance_is_not_occupied() {
        let rooms = [room("101"), room("102")];
        let now = at("2025-06-02T12:00:00Z");
        let issues =
            [issue(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-04T00:00:00Z")];
        let stays =
            [pending(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-04T00:00:00Z")];

        let summary = summarize(&rooms, &stays, &issues, now);

        assert_eq!(summary.rooms_under_maintenance, 1);
        assert_eq!(summary.occupied_rooms, 0);
        assert_eq!(summary.available_rooms, 1);
    }

    #[test]
    fn counts_room_once_for_many_stays() {
        let rooms = [room("101")];
        let now = at("2025-06-02T12:00:00Z");
        let stays = [
            pending(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-04T00:00:00Z"),
            pending(rooms[0].id, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z"),
        ];

        let summary = summarize(&rooms, &stays, &[], now);

        assert_eq!(summary.occupied_rooms, 1);
        assert_eq!(summary.available_rooms, 0);
    }

    #[test]
    fn clamps_available_rooms_at_zero() {
        assert_eq!(
            Summary::new(3, 2, 2),
            Summary {
                total_rooms: 3,
                available_rooms: 0,
                occupied_rooms: 2,
                rooms_under_maintenance: 2,
            },
        );
        assert_eq!(Summary::new(0, 1, 0).available_rooms, 0);
    }

    #[test]
    fn is_idempotent() {
        let rooms = [room("101"), room("102")];
        let stays =
            [pending(rooms[0].id, "2025-06-01T00:00:00Z", "2025-06-03T00:00:00Z")];
        let issues =
            [issue(rooms[1].id, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z")];
        let days = Days::new(date("2025-06-01"), date("2025-06-04"));
        let now = at("2025-06-02T12:00:00Z");

        assert_eq!(
            calendar(&rooms, &stays, &issues, days, CALENDAR_CHECK_TIME),
            calendar(&rooms, &stays, &issues, days, CALENDAR_CHECK_TIME),
        );
        assert_eq!(
            summarize(&rooms, &stays, &issues, now),
            summarize(&rooms, &stays, &issues, now),
        );
        assert_eq!(
            resolve(&stays, &issues, now).status(),
            resolve(&stays, &issues, now).status(),
        );
    }

    #[test]
    fn reports_status_as_of_evening() {
        let as_of = status_as_of(at("2025-06-02T08:30:00Z"));

        assert_eq!(as_of.to_rfc3339(), "2025-06-02T19:00:00Z");
    }
}
