//! Unit tests for md-model entities.

use md_core::{CustomerId, Forecast, NodeId, OrderId, RestaurantId, SimTime};

use crate::Order;

fn order(id: u32, customer: u32, restaurant: u32, prep: Forecast<u64>) -> Order {
    Order {
        id:         OrderId(id),
        customer:   CustomerId(customer),
        restaurant: RestaurantId(restaurant),
        start_at:   None,
        prep_secs:  prep,
    }
}

#[cfg(test)]
mod insert {
    use crate::{InsertAt, ModelError};

    #[test]
    fn end_and_index_resolve() {
        assert_eq!(InsertAt::End.resolve(3).unwrap(), 3);
        assert_eq!(InsertAt::Index(0).resolve(3).unwrap(), 0);
        assert_eq!(InsertAt::Index(3).resolve(3).unwrap(), 3);
    }

    #[test]
    fn past_the_end_is_rejected() {
        let err = InsertAt::Index(4).resolve(3).unwrap_err();
        assert!(matches!(err, ModelError::IndexOutOfRange { index: 4, len: 3 }));
    }
}

// ── Customer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod customer {
    use md_core::{CustomerId, NodeId, RestaurantId, SimTime};

    use crate::{Customer, CustomerStatus, ModelError};

    fn two_restaurant_customer() -> Customer {
        Customer::new(
            CustomerId(0),
            NodeId(5),
            SimTime(1_000),
            SimTime(3_400),
            vec![RestaurantId(0), RestaurantId(1)],
        )
    }

    #[test]
    fn starts_unrevealed() {
        assert_eq!(two_restaurant_customer().status(), CustomerStatus::Unrevealed);
    }

    #[test]
    fn served_only_after_every_part_arrives() {
        let mut c = two_restaurant_customer();
        c.reveal().unwrap();
        assert!(!c.record_delivery(RestaurantId(0), SimTime(2_000)).unwrap());
        assert!(c.mark_served().is_err());
        assert_eq!(c.status(), CustomerStatus::Waiting);
        assert_eq!(c.delay_secs(), None);

        assert!(c.record_delivery(RestaurantId(1), SimTime(3_500)).unwrap());
        c.mark_served().unwrap();
        assert_eq!(c.status(), CustomerStatus::Served);
        assert_eq!(c.last_delivery(), Some(SimTime(3_500)));
        assert_eq!(c.delay_secs(), Some(100));
    }

    #[test]
    fn early_delivery_has_zero_delay() {
        let mut c = Customer::new(CustomerId(1), NodeId(0), SimTime(0), SimTime(2_400), vec![RestaurantId(2)]);
        c.reveal().unwrap();
        c.record_delivery(RestaurantId(2), SimTime(1_200)).unwrap();
        c.mark_served().unwrap();
        assert_eq!(c.delay_secs(), Some(0));
    }

    #[test]
    fn transitions_never_go_backwards() {
        let mut c = two_restaurant_customer();
        c.reveal().unwrap();
        assert!(matches!(c.reveal(), Err(ModelError::InvalidTransition { .. })));
    }

    #[test]
    fn serving_an_unrevealed_customer_fails() {
        let mut c = Customer::new(CustomerId(2), NodeId(0), SimTime(0), SimTime(10), vec![RestaurantId(0)]);
        c.record_delivery(RestaurantId(0), SimTime(5)).unwrap();
        assert!(c.mark_served().is_err());
    }

    #[test]
    fn foreign_restaurant_is_rejected() {
        let mut c = two_restaurant_customer();
        c.reveal().unwrap();
        let err = c.record_delivery(RestaurantId(9), SimTime(10)).unwrap_err();
        assert!(matches!(err, ModelError::NotOrderedFrom { .. }));
    }
}

// ── Restaurant ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod restaurant {
    use md_core::{CustomerId, Forecast, NodeId, RestaurantId, SimRng, SimTime, Timeline};

    use super::order;
    use crate::{InsertAt, Restaurant};

    fn restaurant() -> Restaurant {
        Restaurant::new(RestaurantId(0), NodeId(1))
    }

    fn ready_times(r: &Restaurant, timeline: Timeline) -> Vec<SimTime> {
        r.queue().map(|(_, ready)| ready.get(timeline)).collect()
    }

    #[test]
    fn first_order_is_ready_after_its_prep_time() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::exact(300)), SimTime(1_000)).unwrap();
        assert_eq!(ready_times(&r, Timeline::Actual), vec![SimTime(1_300)]);
    }

    #[test]
    fn front_insertion_shifts_the_rest() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::exact(300)), SimTime(1_000)).unwrap();
        r.take_order(InsertAt::Index(0), order(1, 1, 0, Forecast::exact(200)), SimTime(1_000)).unwrap();
        assert_eq!(ready_times(&r, Timeline::Actual), vec![SimTime(1_200), SimTime(1_500)]);
        assert_eq!(ready_times(&r, Timeline::Estimated), vec![SimTime(1_200), SimTime(1_500)]);
    }

    #[test]
    fn middle_insertion_chains_from_predecessor() {
        let mut r = restaurant();
        let now = SimTime(0);
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::new(100, 150)), now).unwrap();
        r.take_order(InsertAt::End, order(1, 1, 0, Forecast::new(100, 50)), now).unwrap();
        r.take_order(InsertAt::Index(1), order(2, 2, 0, Forecast::new(60, 70)), now).unwrap();

        assert_eq!(ready_times(&r, Timeline::Estimated), vec![SimTime(100), SimTime(160), SimTime(260)]);
        assert_eq!(ready_times(&r, Timeline::Actual), vec![SimTime(150), SimTime(220), SimTime(270)]);
    }

    #[test]
    fn out_of_range_insertion_is_rejected() {
        let mut r = restaurant();
        assert!(r.take_order(InsertAt::Index(1), order(0, 0, 0, Forecast::exact(1)), SimTime(0)).is_err());
        assert_eq!(r.queue_len(), 0);
    }

    #[test]
    fn update_moves_finished_orders_on_the_actual_timeline() {
        let mut r = restaurant();
        // Estimated ready 1100, actual ready 1300.
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::new(100, 300)), SimTime(1_000)).unwrap();
        r.take_order(InsertAt::End, order(1, 1, 0, Forecast::exact(100)), SimTime(1_000)).unwrap();

        assert_eq!(r.update(SimTime(1_299)), 0);
        assert_eq!(r.update(SimTime(1_300)), 1);
        assert_eq!(r.queue_len(), 1);
        assert_eq!(r.prepared().count(), 1);
        assert!(r.holds_order_for(CustomerId(0)));
    }

    #[test]
    fn waiting_time_tracks_the_latest_queued_order() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::new(200, 300)), SimTime(1_000)).unwrap();
        r.take_order(InsertAt::End, order(1, 1, 0, Forecast::new(200, 300)), SimTime(1_000)).unwrap();

        let both = [CustomerId(0), CustomerId(1)];
        assert_eq!(r.waiting_time(&both, SimTime(1_100), Timeline::Estimated), 300);
        assert_eq!(r.waiting_time(&both, SimTime(1_100), Timeline::Actual), 500);
        assert_eq!(r.waiting_time(&[CustomerId(0)], SimTime(2_000), Timeline::Actual), 0);
        assert_eq!(r.waiting_time(&[CustomerId(7)], SimTime(0), Timeline::Actual), 0);
    }

    #[test]
    fn pickup_wait_remembers_finished_orders() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::exact(300)), SimTime(1_000)).unwrap();
        r.update(SimTime(1_400));

        let c = [CustomerId(0)];
        assert_eq!(r.waiting_time(&c, SimTime(1_100), Timeline::Actual), 0);
        assert_eq!(r.pickup_wait(&c, SimTime(1_100), Timeline::Actual), 200);
    }

    #[test]
    fn release_hands_over_only_requested_orders() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::exact(10)), SimTime(0)).unwrap();
        r.take_order(InsertAt::End, order(1, 1, 0, Forecast::exact(10)), SimTime(0)).unwrap();
        r.update(SimTime(100));

        let taken = r.release(&[CustomerId(1)], SimTime(100));
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].customer, CustomerId(1));
        assert!(r.holds_order_for(CustomerId(0)));
        assert!(!r.holds_order_for(CustomerId(1)));
    }

    #[test]
    fn release_keeps_orders_finished_after_the_collection_time() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::exact(300)), SimTime(1_000)).unwrap();
        r.update(SimTime(1_400));

        assert!(r.release(&[CustomerId(0)], SimTime(1_299)).is_empty());
        assert!(r.holds_order_for(CustomerId(0)));
        assert_eq!(r.release(&[CustomerId(0)], SimTime(1_300)).len(), 1);
    }

    #[test]
    fn summary_exposes_estimates_only() {
        let mut r = restaurant();
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::new(100, 900)), SimTime(0)).unwrap();
        let s = r.summary();
        assert_eq!(s.estimated_finish_times, vec![SimTime(100)]);
        assert_eq!(s.orders_in_queue[0].estimated_preparation_time, 100);
        assert!(s.prepared_orders.is_empty());
    }

    #[test]
    fn queue_stays_chained_under_random_insertions() {
        for seed in 0..20 {
            let mut rng = SimRng::new(seed);
            let mut r = restaurant();
            let now = SimTime(rng.gen_range(0..1_000));
            for i in 0..15 {
                let index = rng.gen_range(0..=r.queue_len());
                let prep = Forecast::new(rng.gen_range(1..900), rng.gen_range(1..900));
                r.take_order(InsertAt::Index(index), order(i, i, 0, prep), now).unwrap();
            }

            let entries: Vec<_> = r.queue().map(|(o, ready)| (o.prep_secs, ready)).collect();
            assert_eq!(entries[0].1, Forecast::exact(now).shifted(entries[0].0), "seed {seed}");
            for pair in entries.windows(2) {
                let (_, prev) = pair[0];
                let (prep, ready) = pair[1];
                assert_eq!(ready, prev.shifted(prep), "seed {seed}");
                assert!(ready.estimated >= prev.estimated && ready.actual >= prev.actual);
            }
        }
    }
}

// ── Stop ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stop {
    use md_core::{CustomerId, Forecast, NodeId, RestaurantId};

    use crate::{ModelError, Stop, StopType};

    #[test]
    fn empty_pickup_is_rejected() {
        let err = Stop::pickup(RestaurantId(0), NodeId(1), vec![], None, 10, Forecast::exact(5)).unwrap_err();
        assert!(matches!(err, ModelError::EmptyPickup(RestaurantId(0))));
    }

    #[test]
    fn total_sums_travel_park_and_wait() {
        let mut s = Stop::pickup(RestaurantId(0), NodeId(1), vec![CustomerId(3)], None, 100, Forecast::new(20, 40))
            .unwrap();
        s.wait = Forecast::new(5, 7);
        assert_eq!(s.total(), Forecast::new(125, 147));
    }

    #[test]
    fn summary_serializes_with_snake_case_type() {
        let s = Stop::delivery(CustomerId(3), NodeId(2), vec![RestaurantId(0)], None, 60, Forecast::exact(30));
        let summary = s.summary();
        assert_eq!(summary.stop_type, StopType::Delivery);
        assert_eq!(summary.estimated_time_required, 90);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["stop_type"], "delivery");
        assert_eq!(json["customer_id"], 3);
        assert!(json["restaurant_id"].is_null());
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vehicle {
    use md_core::{CustomerId, Forecast, NodeId, RestaurantId, SimTime, TravelTimeMatrix, VehicleId};

    use super::order;
    use crate::{InsertAt, ModelError, Restaurant, Restaurants, Stop, Vehicle};

    fn matrix() -> TravelTimeMatrix {
        let mut m = TravelTimeMatrix::new();
        m.insert_symmetric(NodeId(0), NodeId(1), 100);
        m.insert_symmetric(NodeId(1), NodeId(2), 50);
        m.insert_symmetric(NodeId(0), NodeId(2), 120);
        m
    }

    /// Restaurant r_0 at n_1 with c_0's order estimated ready at 1250, actually at 1300.
    fn restaurants() -> Restaurants {
        let mut r = Restaurant::new(RestaurantId(0), NodeId(1));
        r.take_order(InsertAt::End, order(0, 0, 0, Forecast::new(250, 300)), SimTime(1_000)).unwrap();
        Restaurants::from([(RestaurantId(0), r)])
    }

    fn pickup_then_deliver(now: SimTime) -> Vehicle {
        let mut v = Vehicle::new(VehicleId(0), NodeId(0));
        let pickup = Stop::pickup(RestaurantId(0), NodeId(1), vec![CustomerId(0)], None, 100, Forecast::exact(20))
            .unwrap();
        let delivery = Stop::delivery(CustomerId(0), NodeId(2), vec![RestaurantId(0)], None, 50, Forecast::exact(30));
        v.insert(InsertAt::End, pickup, now).unwrap();
        v.insert(InsertAt::End, delivery, now).unwrap();
        v
    }

    #[test]
    fn delivery_completes_exactly_at_travel_plus_park() {
        let mut v = Vehicle::new(VehicleId(0), NodeId(0));
        let stop = Stop::delivery(CustomerId(0), NodeId(2), vec![RestaurantId(0)], None, 100, Forecast::exact(20));
        v.insert(InsertAt::End, stop, SimTime(1_000)).unwrap();
        assert!(v.head_started());

        let mut rs = Restaurants::new();
        assert!(v.advance(SimTime(1_119), &mut rs).unwrap().is_empty());
        assert_eq!(v.route().len(), 1);

        // Nothing in the backpack for c_0, so no delivery is reported.
        assert!(v.advance(SimTime(1_120), &mut rs).unwrap().is_empty());
        assert!(v.is_idle());
        assert_eq!(v.location(), NodeId(2));
    }

    #[test]
    fn origin_is_the_preceding_destination() {
        let v = pickup_then_deliver(SimTime(1_000));
        assert_eq!(v.origin_for(InsertAt::Index(0)).unwrap(), NodeId(0));
        assert_eq!(v.origin_for(InsertAt::Index(1)).unwrap(), NodeId(1));
        assert_eq!(v.origin_for(InsertAt::End).unwrap(), NodeId(2));
        assert!(v.origin_for(InsertAt::Index(3)).is_err());
        assert_eq!(v.next_location(), NodeId(2));
    }

    #[test]
    fn repair_sets_pickup_wait_on_both_timelines() {
        let now = SimTime(1_000);
        let mut v = pickup_then_deliver(now);
        v.repair(now, &matrix(), &restaurants()).unwrap();

        let route = v.route();
        // Arrival at 1120; ready 1250 estimated, 1300 actual.
        assert_eq!(route[0].wait, Forecast::new(130, 180));
        assert_eq!(route[1].planned_start, Forecast::new(SimTime(1_250), SimTime(1_300)));
        assert_eq!(route[1].wait, Forecast::ZERO);
        assert_eq!(v.busy_time(now), 250 + 80);
        assert_eq!(v.busy_time(SimTime(1_100)), 230);
    }

    #[test]
    fn repair_is_idempotent() {
        let now = SimTime(1_000);
        let travel = matrix();
        let restaurants = restaurants();
        let mut v = pickup_then_deliver(now);
        v.repair(now, &travel, &restaurants).unwrap();
        let once = v.route().to_vec();
        v.repair(now, &travel, &restaurants).unwrap();
        assert_eq!(v.route(), once.as_slice());
    }

    #[test]
    fn repair_recomputes_unstarted_travel_from_predecessor() {
        let now = SimTime(1_000);
        let mut v = pickup_then_deliver(now);
        // Pretend the delivery was built from the wrong origin.
        let relocation = Stop::relocation(NodeId(0), None, 999, Forecast::exact(0));
        v.insert(InsertAt::Index(1), relocation, now).unwrap();
        v.repair(now, &matrix(), &restaurants()).unwrap();
        assert_eq!(v.route()[1].travel, Forecast::exact(100));
        assert_eq!(v.route()[2].travel, Forecast::exact(120));
    }

    #[test]
    fn repair_fails_on_unknown_restaurant() {
        let now = SimTime(1_000);
        let mut v = pickup_then_deliver(now);
        assert!(v.repair(now, &matrix(), &Restaurants::new()).is_err());
    }

    #[test]
    fn advance_picks_up_then_delivers() {
        let now = SimTime(1_000);
        let mut rs = restaurants();
        let mut v = pickup_then_deliver(now);
        v.repair(now, &matrix(), &rs).unwrap();

        assert!(v.advance(SimTime(1_299), &mut rs).unwrap().is_empty());

        let progress = v.advance(SimTime(1_300), &mut rs).unwrap();
        assert_eq!(progress.picked_up[&RestaurantId(0)], vec![CustomerId(0)]);
        assert!(progress.missed.is_empty());
        assert!(!rs[&RestaurantId(0)].holds_order_for(CustomerId(0)));
        assert!(progress.delivered.is_empty());
        assert!(v.backpack().contains(&(RestaurantId(0), CustomerId(0))));
        assert_eq!(v.route()[0].started_at, Some(SimTime(1_300)));
        assert_eq!(v.location(), NodeId(1));

        let progress = v.advance(SimTime(1_380), &mut rs).unwrap();
        assert_eq!(progress.delivered[&CustomerId(0)], vec![(RestaurantId(0), SimTime(1_380))]);
        assert!(v.backpack().is_empty());
        assert!(v.is_idle());
        assert_eq!(v.location(), NodeId(2));
    }

    #[test]
    fn advance_completes_several_stops_in_one_call() {
        let now = SimTime(1_000);
        let mut rs = restaurants();
        let mut v = pickup_then_deliver(now);
        v.repair(now, &matrix(), &rs).unwrap();
        let progress = v.advance(SimTime(5_000), &mut rs).unwrap();
        assert_eq!(progress.delivered[&CustomerId(0)], vec![(RestaurantId(0), SimTime(1_380))]);
        assert!(v.is_idle());
    }

    #[test]
    fn unprepared_pickup_is_missed_and_never_delivered() {
        let now = SimTime(1_000);
        let mut rs = Restaurants::from([(RestaurantId(0), Restaurant::new(RestaurantId(0), NodeId(1)))]);
        let mut v = pickup_then_deliver(now);

        // Both stops complete within this call, but r_0 never had the order.
        let progress = v.advance(SimTime(5_000), &mut rs).unwrap();
        assert!(progress.picked_up.is_empty());
        assert_eq!(progress.missed, vec![(RestaurantId(0), CustomerId(0))]);
        assert!(progress.delivered.is_empty());
        assert!(v.backpack().is_empty());
        assert!(v.is_idle());
    }

    #[test]
    fn pickup_completing_before_the_order_is_ready_misses_it() {
        let now = SimTime(1_000);
        let mut rs = restaurants();
        let mut v = pickup_then_deliver(now);
        // Unrepaired route: the pickup completes at 1120 with no wait, the
        // order is only ready at 1300.
        rs.get_mut(&RestaurantId(0)).unwrap().update(SimTime(1_400));

        let progress = v.advance(SimTime(1_200), &mut rs).unwrap();
        assert_eq!(progress.missed, vec![(RestaurantId(0), CustomerId(0))]);
        assert!(progress.delivered.is_empty());
        assert!(rs[&RestaurantId(0)].holds_order_for(CustomerId(0)));
    }

    #[test]
    fn pickup_at_unknown_restaurant_fails() {
        let mut v = pickup_then_deliver(SimTime(1_000));
        let err = v.advance(SimTime(5_000), &mut Restaurants::new()).unwrap_err();
        assert!(matches!(err, ModelError::UnknownRestaurant(RestaurantId(0))));
    }

    #[test]
    fn deferred_stop_waits_for_its_start_time() {
        let now = SimTime(1_000);
        let mut v = Vehicle::new(VehicleId(1), NodeId(0));
        let stop = Stop::relocation(NodeId(1), Some(SimTime(2_000)), 100, Forecast::exact(10));
        v.insert(InsertAt::End, stop, now).unwrap();
        assert!(!v.head_started());
        assert_eq!(v.busy_time(now), 1_000 + 110);

        v.repair(now, &matrix(), &Restaurants::new()).unwrap();
        assert_eq!(v.route()[0].planned_start, Forecast::exact(SimTime(2_000)));

        let mut rs = Restaurants::new();
        v.advance(SimTime(1_500), &mut rs).unwrap();
        assert!(!v.head_started());
        v.advance(SimTime(2_050), &mut rs).unwrap();
        assert_eq!(v.route()[0].started_at, Some(SimTime(2_000)));
        v.advance(SimTime(2_110), &mut rs).unwrap();
        assert!(v.is_idle());
        assert_eq!(v.location(), NodeId(1));
    }

    #[test]
    fn idle_vehicle_reports_its_location() {
        let v = Vehicle::new(VehicleId(2), NodeId(7));
        assert_eq!(v.next_location(), NodeId(7));
        let s = v.summary(SimTime(0));
        assert_eq!(s.busy_time, 0);
        assert!(s.sequence_of_actions.is_empty());
    }
}

// ── Route insertion rules ─────────────────────────────────────────────────────

#[cfg(test)]
mod insertion {
    use md_core::{Forecast, NodeId, SimTime, VehicleId};

    use crate::{InsertAt, ModelError, Stop, Vehicle};

    fn relocation(to: u32, start_at: Option<SimTime>) -> Stop {
        Stop::relocation(NodeId(to), start_at, 60, Forecast::exact(0))
    }

    #[test]
    fn cannot_insert_before_started_head() {
        let mut v = Vehicle::new(VehicleId(3), NodeId(0));
        v.insert(InsertAt::End, relocation(1, None), SimTime(10)).unwrap();
        let err = v.insert(InsertAt::Index(0), relocation(2, None), SimTime(10)).unwrap_err();
        assert!(matches!(err, ModelError::DisplacesStartedStop(VehicleId(3))));
        assert_eq!(v.route().len(), 1);
    }

    #[test]
    fn new_head_in_front_of_deferred_stop_starts_now() {
        let mut v = Vehicle::new(VehicleId(0), NodeId(0));
        v.insert(InsertAt::End, relocation(1, Some(SimTime(5_000))), SimTime(10)).unwrap();
        assert!(!v.head_started());
        v.insert(InsertAt::Index(0), relocation(2, None), SimTime(10)).unwrap();
        assert_eq!(v.route()[0].started_at, Some(SimTime(10)));
        assert_eq!(v.route()[1].started_at, None);
    }

    #[test]
    fn insert_past_the_end_is_rejected() {
        let mut v = Vehicle::new(VehicleId(0), NodeId(0));
        v.insert(InsertAt::End, relocation(1, None), SimTime(0)).unwrap();
        assert!(v.insert(InsertAt::Index(2), relocation(2, None), SimTime(0)).is_err());
        assert_eq!(v.route().len(), 1);
    }
}
