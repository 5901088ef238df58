use wasm_minimal_protocol::abi::Status ;
use wasm_minimal_protocol::host::{ CallOutcome, DispatchError, ProtocolViolation };

#[test]
fn success_without_result_is_rejected() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "no_result", &[] ) {
		Err( DispatchError::ProtocolViolation( ProtocolViolation::MissingResult )) => {}
		other => panic!( "Expected MissingResult, found: {:#?}", other ),
	}

	let record = plugin.last_call().expect( "call should be recorded" );
	assert_eq!( record.status, Some( Status::SUCCESS ));
	assert_eq!( record.results_sent, 0 );
	assert!( plugin.is_poisoned() );

	let mut plugin = plugin.reinstantiate().expect( "Failed to reinstantiate plugin" );
	assert!( matches!( plugin.call( "hello", &[] ), Ok( CallOutcome::Success( _ ))));

}
