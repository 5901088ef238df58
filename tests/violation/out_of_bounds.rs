use wasm_minimal_protocol::host::{ DispatchError, ProtocolViolation };

#[test]
fn writing_past_the_end_of_memory_is_rejected() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "write_past_end", &[ b"eight b." ]) {
		Err( DispatchError::ProtocolViolation( ProtocolViolation::OutOfBounds { ptr, len })) => {
			assert_eq!( ptr, 65_535 );
			assert_eq!( len, 8 );
		},
		other => panic!( "Expected OutOfBounds, found: {:#?}", other ),
	}
	assert_eq!( plugin.last_call().expect( "call should be recorded" ).args_written, None );

}

#[test]
fn sending_past_the_end_of_memory_is_rejected() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "send_past_end", &[] ) {
		Err( DispatchError::ProtocolViolation( ProtocolViolation::OutOfBounds { ptr, len })) => {
			assert_eq!( ptr, 65_532 );
			assert_eq!( len, 8 );
		},
		other => panic!( "Expected OutOfBounds, found: {:#?}", other ),
	}
	assert!( plugin.is_poisoned() );

}
