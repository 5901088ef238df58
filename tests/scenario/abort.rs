use wasm_minimal_protocol::host::{ CallOutcome, DispatchError };

#[test]
fn abort_produces_no_status_and_no_result() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "will_panic", &[] ) {
		Ok( CallOutcome::Aborted( _ )) => {}
		other => panic!( "Expected Aborted, found: {:#?}", other ),
	}

	let record = plugin.last_call().expect( "call should be recorded" );
	assert_eq!( record.status, None );
	assert_eq!( record.results_sent, 0 );

}

#[test]
fn aborted_instance_refuses_calls_until_reinstantiated() {

	let mut plugin = crate::fixtures::protocol();
	assert!( matches!( plugin.call( "will_panic", &[] ), Ok( CallOutcome::Aborted( _ ))));
	assert!( plugin.is_poisoned() );

	match plugin.call( "returns_ok", &[] ) {
		Err( DispatchError::Poisoned ) => {}
		other => panic!( "Expected Poisoned, found: {:#?}", other ),
	}

	let mut plugin = plugin.reinstantiate().expect( "Failed to reinstantiate plugin" );
	assert!( !plugin.is_poisoned() );
	assert!( plugin.last_call().is_none() );
	match plugin.call( "returns_ok", &[] ) {
		Ok( CallOutcome::Success( payload )) => assert_eq!( payload, b"This is an `Ok`" ),
		other => panic!( "Expected Success, found: {:#?}", other ),
	}

}
