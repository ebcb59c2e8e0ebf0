//! # Concurrent Writers
//!
//! Many external threads and loop tasks writing to one connection at once.
//! External writers are only ordered relative to themselves; each writer's
//! own sequence must survive, and nothing may be lost or duplicated.

#[cfg(test)]
mod tests {
    use super::super::WAIT;
    use ow_ordering::domain::invariants::{invariant_exactly_once, invariant_per_writer_order};
    use ow_ordering::testing::ConnectionFixture;
    use ow_ordering::HandlerContext;
    use ow_telemetry::init_test_logging;
    use rand::Rng;
    use std::sync::{Arc, Barrier};
    use std::thread;

    /// Message tagged with its writer and its position in that writer's run.
    type Tagged = (u32, u32);

    #[test]
    fn test_external_writers_keep_their_own_order() {
        init_test_logging();
        let conn = ConnectionFixture::<Tagged>::new("external-writers").unwrap();
        let ctx = conn.ordered_context();

        let mut rng = rand::thread_rng();
        let plans: Vec<Vec<Tagged>> = (0..6)
            .map(|writer| {
                let count = rng.gen_range(50..150);
                (0..count).map(|seq| (writer, seq)).collect()
            })
            .collect();

        let barrier = Arc::new(Barrier::new(plans.len()));
        let handles: Vec<_> = plans
            .iter()
            .cloned()
            .map(|plan| {
                let ctx = ctx.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    plan.into_iter()
                        .map(|msg| ctx.write_and_flush(msg))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for promise in handle.join().unwrap() {
                assert_eq!(promise.wait_timeout(WAIT), Some(Ok(())));
            }
        }

        let issued = conn.drain();
        let invoked: Vec<Tagged> = plans.iter().flatten().copied().collect();
        assert!(invariant_per_writer_order(&plans, &issued));
        assert!(invariant_exactly_once(&invoked, &issued));
    }

    #[test]
    fn test_mixed_loop_and_external_writers() {
        init_test_logging();
        let conn = ConnectionFixture::<Tagged>::new("mixed-writers").unwrap();
        let ctx = conn.ordered_context();

        const LOOP_WRITER: u32 = 100;
        const ROUNDS: u32 = 50;

        let external_plans: Vec<Vec<Tagged>> = (0..4)
            .map(|writer| (0..ROUNDS).map(|seq| (writer, seq)).collect())
            .collect();
        let loop_plan: Vec<Tagged> = (0..ROUNDS).map(|seq| (LOOP_WRITER, seq)).collect();

        let barrier = Arc::new(Barrier::new(external_plans.len() + 1));
        let mut handles = Vec::new();

        for plan in external_plans.iter().cloned() {
            let ctx = ctx.clone();
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                plan.into_iter().map(|msg| ctx.write(msg)).collect::<Vec<_>>()
            }));
        }

        // One loop task per message so external writes interleave between them
        barrier.wait();
        let mut loop_promises = Vec::new();
        for msg in loop_plan.iter().copied() {
            let ctx = ctx.clone();
            loop_promises.push(conn.on_loop(move || ctx.write(msg)).unwrap());
        }

        for handle in handles {
            for promise in handle.join().unwrap() {
                assert_eq!(promise.wait_timeout(WAIT), Some(Ok(())));
            }
        }
        for promise in loop_promises {
            assert_eq!(promise.wait_timeout(WAIT), Some(Ok(())));
        }

        let issued = conn.drain();
        let mut all_plans = external_plans.clone();
        all_plans.push(loop_plan);
        let invoked: Vec<Tagged> = all_plans.iter().flatten().copied().collect();

        assert!(invariant_per_writer_order(&all_plans, &issued));
        assert!(invariant_exactly_once(&invoked, &issued));
    }

    #[test]
    fn test_loop_write_lands_after_every_external_write_queued_before_it() {
        init_test_logging();
        let conn = ConnectionFixture::<Tagged>::new("fence").unwrap();
        let ctx = conn.ordered_context();

        let external: Vec<Tagged> = (0..200).map(|seq| (0, seq)).collect();
        let fence: Tagged = (1, 0);

        let loop_ctx = ctx.clone();
        let writes = external.clone();
        let promise = conn
            .on_loop(move || {
                let remote = loop_ctx.clone();
                thread::spawn(move || {
                    for msg in writes {
                        remote.write(msg);
                    }
                })
                .join()
                .unwrap();
                loop_ctx.write_and_flush(fence)
            })
            .unwrap();

        assert_eq!(promise.wait_timeout(WAIT), Some(Ok(())));
        let issued = conn.drain();
        assert_eq!(issued.last(), Some(&fence));
        assert_eq!(&issued[..external.len()], &external[..]);
    }
}
