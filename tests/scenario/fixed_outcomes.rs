use wasm_minimal_protocol::abi::Status ;
use wasm_minimal_protocol::host::CallOutcome ;

#[test]
fn returns_ok_is_stable() {
	let mut plugin = crate::fixtures::protocol();
	for _ in 0..3 {
		match plugin.call( "returns_ok", &[] ) {
			Ok( CallOutcome::Success( payload )) => assert_eq!( payload, b"This is an `Ok`" ),
			other => panic!( "Expected Success, found: {:#?}", other ),
		}
	}
}

#[test]
fn returns_err_is_stable() {
	let mut plugin = crate::fixtures::protocol();
	for _ in 0..3 {
		match plugin.call( "returns_err", &[] ) {
			Ok( CallOutcome::Failure( diagnostic )) => assert_eq!( diagnostic, b"This is an `Err`" ),
			other => panic!( "Expected Failure, found: {:#?}", other ),
		}
		assert_eq!( plugin.last_call().and_then(| record | record.status ), Some( Status::FAILURE ));
	}
	assert!( !plugin.is_poisoned() );
}

#[test]
fn failure_without_payload_is_not_read() {
	let mut plugin = crate::fixtures::protocol();
	match plugin.call( "no_payload", &[] ) {
		Ok( CallOutcome::NoPayload { status }) => assert_eq!( status.code(), 3 ),
		other => panic!( "Expected NoPayload, found: {:#?}", other ),
	}
	assert!( !plugin.is_poisoned() );
}
