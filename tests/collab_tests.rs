//! End-to-end tests for the I/O collaborators around the binder
//!
//! # Test Coverage
//!
//! - Draining a form-encoded body, binding it, and still forwarding an
//!   identical copy downstream
//! - Query extraction through the `Url` value object into the binder
//! - Buffer pool reuse across acquire/release cycles

use std::io::Read;

use formbind::{bind, drain_body, Bindable, Body, BufferPool, Url, Values};

mod common;

#[derive(Debug, Default, PartialEq, Bindable)]
struct User {
    #[form("firstname")]
    firstname: String,
    #[form("lastname")]
    lastname: String,
    #[form("age,default=18")]
    age: i32,
}

#[test]
fn test_body_is_parsed_once_and_forwarded_unconsumed() {
    common::init_tracing();

    let payload = "firstname=Feng&lastname=Yang&age=10";
    let body = Body::from_reader(std::io::Cursor::new(payload.as_bytes().to_vec()));

    let (replacement, mut copy) = drain_body(body).unwrap();

    // Parse the copy into a Values map and bind it.
    let mut raw = String::new();
    copy.read_to_string(&mut raw).unwrap();
    let form = Values::parse_query(&raw);

    let mut user = User::default();
    bind(&form, &mut user).unwrap();
    assert_eq!(
        user,
        User { firstname: "Feng".into(), lastname: "Yang".into(), age: 10 }
    );

    // The replacement still carries the full original payload.
    let mut forwarded = String::new();
    let mut replacement = replacement;
    replacement.read_to_string(&mut forwarded).unwrap();
    assert_eq!(forwarded, payload);
}

#[test]
fn test_query_params_bind_through_url() {
    let url = Url::parse("http://example.com/users?firstname=Ada&lastname=Lovelace").unwrap();

    let mut user = User::default();
    bind(url.query(), &mut user).unwrap();

    assert_eq!(user.firstname, "Ada");
    assert_eq!(user.lastname, "Lovelace");
    assert_eq!(user.age, 18);
}

#[test]
fn test_buffer_pool_reuses_across_requests() {
    let pool = BufferPool::new(128);

    let mut buffer = pool.acquire();
    buffer.extend_from_slice(b"request one");
    pool.release(buffer);

    let buffer = pool.acquire();
    assert!(buffer.is_empty());
    assert!(buffer.capacity() >= 128);
}
