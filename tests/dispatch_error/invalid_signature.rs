use wasm_minimal_protocol::host::DispatchError ;

#[test]
fn dispatch_error_invalid_signature() {

	let mut plugin = crate::fixtures::protocol();

	match plugin.call( "wide_length", &[ b"x" ]) {
		Err( DispatchError::InvalidSignature { function, found }) => {
			assert_eq!( function, "wide_length" );
			assert_eq!( found, "(i64) -> (i32)" );
		},
		other => panic!( "Expected InvalidSignature, found: {:#?}", other ),
	}

	match plugin.call( "no_status", &[ b"x" ]) {
		Err( DispatchError::InvalidSignature { found, .. }) => assert_eq!( found, "(i32) -> ()" ),
		other => panic!( "Expected InvalidSignature, found: {:#?}", other ),
	}

	assert!( !plugin.is_poisoned() );

}
