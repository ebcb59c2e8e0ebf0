//! # Wrapping
//!
//! One ordered context per connection, however many times and from however
//! many threads `wrap` is called.

#[cfg(test)]
mod tests {
    use super::super::WAIT;
    use ow_ordering::testing::ConnectionFixture;
    use ow_ordering::{wrap, Channel, HandlerContext, SharedContext, ORDERED};
    use ow_telemetry::{init_test_logging, ORDERED_CONTEXTS_INSTALLED};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_second_wrap_is_a_no_op() {
        init_test_logging();
        let conn = ConnectionFixture::<&'static str>::new("wrap-twice").unwrap();

        let first = conn.ordered_context();
        let second = wrap(first.clone());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(conn.channel.attributes().get(&ORDERED), Some(true));
    }

    #[test]
    fn test_only_one_proxy_defers_each_write() {
        init_test_logging();
        let conn = ConnectionFixture::<&'static str>::new("single-proxy").unwrap();
        let ctx = wrap(wrap(conn.ordered_context()));

        let promise = conn.on_loop(move || ctx.write("once")).unwrap();
        assert_eq!(promise.wait_timeout(WAIT), Some(Ok(())));
        assert_eq!(conn.drain(), vec!["once"]);

        // The submitted closure plus a single deferred write
        assert_eq!(conn.event_loop.tasks_executed(), 2);
    }

    #[test]
    fn test_concurrent_wraps_install_one_context() {
        init_test_logging();
        let conn = ConnectionFixture::<u64>::new("racing-wraps").unwrap();
        let raw = conn.raw_context();
        let before = ORDERED_CONTEXTS_INSTALLED.get();

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let raw = raw.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    wrap(raw)
                })
            })
            .collect();

        let results: Vec<SharedContext<u64>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        let installed = results
            .iter()
            .filter(|ctx| !Arc::ptr_eq(ctx, &raw))
            .count();

        assert_eq!(installed, 1);
        assert!(ORDERED_CONTEXTS_INSTALLED.get() - before >= 1.0);
    }

    #[test]
    fn test_each_connection_gets_its_own_context() {
        init_test_logging();
        let left = ConnectionFixture::<&'static str>::new("left").unwrap();
        let right = ConnectionFixture::<&'static str>::new("right").unwrap();

        let left_ctx = left.ordered_context();
        let right_ctx = right.ordered_context();

        assert!(!Arc::ptr_eq(&left_ctx, &left.raw_context()));
        assert!(!Arc::ptr_eq(&right_ctx, &right.raw_context()));
        assert_ne!(left_ctx.channel().id(), right_ctx.channel().id());
    }

    #[test]
    fn test_wrapped_context_forwards_passthrough_operations() {
        init_test_logging();
        let conn = ConnectionFixture::<&'static str>::new("passthrough").unwrap();
        let ctx = conn.ordered_context();

        assert_eq!(ctx.name(), "transport");
        ctx.read();
        ctx.fire_user_event("writability-changed");

        assert_eq!(conn.context.reads_requested(), 1);
        assert_eq!(
            conn.context.user_events(),
            vec!["writability-changed".to_string()]
        );
        assert!(ctx.channel().is_active());
    }
}
