pub(crate) mod event_loop;
