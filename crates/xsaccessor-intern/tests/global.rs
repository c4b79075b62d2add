use std::thread;
use xsaccessor_intern::global;
use xsaccessor_intern::{InternConfig, InternError};

// One test per binary: the process-wide context is shared state.
#[test]
fn test_process_wide_context() {
    assert_eq!(global::intern_key("name").as_u32(), 0);
    assert_eq!(global::intern_key("age").as_u32(), 1);

    let from_other_thread = thread::spawn(|| global::intern_key("name")).join().unwrap();
    assert_eq!(from_other_thread.as_u32(), 0);

    assert_eq!(global::resolve_array_index(5).as_u32(), 0);
    assert_eq!(global::resolve_array_index(2).as_u32(), 1);
    assert_eq!(global::resolve_array_index(5).as_u32(), 0);

    assert!(std::ptr::eq(global::context(), global::context()));
    assert!(matches!(
        global::init_with(&InternConfig::default()),
        Err(InternError::AlreadyInitialized)
    ));
}
