use wasm_minimal_protocol::host::CallOutcome ;

#[test]
fn concatenation_inserts_a_star() {

	let mut plugin = crate::fixtures::protocol();

	let samples: [&[u8]; 5] = [ b"", b"val1", b"value2", &[ 0x00, 0xFF, 0x2A ], &[ 0x7A; 300 ]];
	for x in samples {
		for y in samples {
			match plugin.call( "concatenate", &[ x, y ]) {
				Ok( CallOutcome::Success( payload )) => {
					assert_eq!( payload.len(), x.len() + y.len() + 1 );
					assert_eq!( payload, [ x, b"*", y ].concat() );
				},
				other => panic!( "Expected Success, found: {:#?}", other ),
			}
		}
	}

}

#[test]
fn concatenation_of_reference_values() {
	let mut plugin = crate::fixtures::protocol();
	match plugin.call( "concatenate", &[ b"val1", b"value2" ]) {
		Ok( CallOutcome::Success( payload )) => assert_eq!( payload, b"val1*value2" ),
		other => panic!( "Expected Success, found: {:#?}", other ),
	}
}
