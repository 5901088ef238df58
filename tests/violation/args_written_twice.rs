use wasm_minimal_protocol::host::{ DispatchError, ProtocolViolation };

#[test]
fn writing_twice_is_rejected() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "write_twice", &[ b"abc" ]) {
		Err( DispatchError::ProtocolViolation( ProtocolViolation::ArgsWrittenTwice )) => {}
		other => panic!( "Expected ArgsWrittenTwice, found: {:#?}", other ),
	}

	let record = plugin.last_call().expect( "call should be recorded" );
	assert_eq!( record.args_written, Some( 3 ));
	assert_eq!( record.results_sent, 0 );
	assert_eq!( record.status, None );

}
