use yaogc::{
    Circuit, CircuitCreationValues, ContiguousTables, Error, GarbledCircuit, GarblingConfig, Gate,
    GateKind, InputKeys, SchemeKind, TableLayout, TranslationTable, WireKey, WirePair,
};

fn init_logger() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .parse_filters("yaogc=debug")
        .try_init();
}

fn adder() -> Circuit {
    // 2-bit adder without carry out, plus a NOR and a NOT to cover every kind
    Circuit::new(
        vec![
            Gate::xor(0, 2, 4),
            Gate::and(0, 2, 5),
            Gate::xor(1, 3, 6),
            Gate::xor(5, 6, 7),
            Gate::binary(GateKind::Nor, 1, 3, 8),
            Gate::binary(GateKind::Xnor, 0, 1, 9),
            Gate::not(9, 10),
            Gate::binary(GateKind::Nand, 2, 3, 11),
            Gate::or(10, 11, 12),
        ],
        vec![vec![0, 1], vec![2, 3]],
        vec![4, 7, 8, 12],
    )
}

fn configs() -> [GarblingConfig; 2] {
    [
        GarblingConfig::new(SchemeKind::HalfGates, TableLayout::Contiguous),
        GarblingConfig::new(SchemeKind::RowReduction, TableLayout::PerGate),
    ]
}

fn garbled(config: &GarblingConfig) -> Result<(GarbledCircuit, CircuitCreationValues), Error> {
    let mut gc = GarbledCircuit::new(adder(), config)?;
    let values = gc.garble()?;
    Ok((gc, values))
}

fn tampered_tables(gc: &GarbledCircuit, byte: usize, bit: u8) -> Box<ContiguousTables> {
    let mut bytes = gc.garbled_tables().as_buffer_set().concat();
    bytes[byte] ^= 1 << bit;
    Box::new(ContiguousTables::new(bytes))
}

#[test]
fn test_honest_garbling_verifies() -> Result<(), Error> {
    init_logger();
    for config in configs() {
        let (gc, values) = garbled(&config)?;

        assert!(gc.verify(values.input_keys())?);

        let all_output_keys = gc.internal_verify(values.input_keys())?.unwrap();
        assert_eq!(&all_output_keys, values.output_keys());
        assert!(gc.verify_translation_table(&all_output_keys));
    }
    Ok(())
}

#[test]
fn test_verification_on_another_instance() -> Result<(), Error> {
    init_logger();
    for config in configs() {
        let (mut garbler, values) = garbled(&config)?;

        let mut verifier = GarbledCircuit::new(garbler.circuit().clone(), &config)?;
        verifier.set_garbled_tables(garbler.take_garbled_tables())?;
        verifier.set_translation_table(values.translation_table().clone())?;
        assert!(verifier.verify(values.input_keys())?);
    }
    Ok(())
}

#[test]
fn test_every_table_bit_flip_is_detected() -> Result<(), Error> {
    init_logger();
    for config in configs() {
        let (mut gc, values) = garbled(&config)?;
        let table_bytes = gc.garbled_tables().total_size();
        let honest = gc.garbled_tables().clone_boxed();

        let mut rejected = 0;
        for byte in 0..table_bytes {
            for bit in 0..8 {
                gc.set_garbled_tables(tampered_tables(&gc, byte, bit))?;
                if !gc.verify(values.input_keys())? {
                    rejected += 1;
                }
                gc.set_garbled_tables(honest.clone_boxed())?;
            }
        }
        assert_eq!(rejected, table_bytes * 8);
        assert!(gc.verify(values.input_keys())?);
    }
    Ok(())
}

#[test]
fn test_tampered_translation_table() -> Result<(), Error> {
    for config in configs() {
        let (mut gc, values) = garbled(&config)?;
        let honest = values.translation_table().entries().to_vec();

        for output in 0..honest.len() {
            let mut entries = honest.clone();
            entries[output] = !entries[output];
            gc.set_translation_table(TranslationTable::new(entries))?;

            assert!(!gc.verify(values.input_keys())?);
            // the tables themselves are still fine
            let all_output_keys = gc.internal_verify(values.input_keys())?.unwrap();
            assert!(!gc.verify_translation_table(&all_output_keys));
        }
    }
    Ok(())
}

#[test]
fn test_wrong_input_keys() -> Result<(), Error> {
    for config in configs() {
        let (gc, values) = garbled(&config)?;
        let pairs = values.input_keys().pairs();

        // keys of another garbling
        let (_, other) = garbled(&config)?;
        assert!(!gc.verify(other.input_keys())?);

        // swapped keys of a single wire
        let mut swapped = pairs.to_vec();
        swapped[1] = WirePair {
            key0: swapped[1].key1,
            key1: swapped[1].key0,
        };
        assert!(!gc.verify(&InputKeys::new(swapped))?);

        // a wire that does not share the offset
        let mut offset = pairs.to_vec();
        offset[2].key1 = offset[2].key1 ^ WireKey::from(2u128);
        assert!(!gc.verify(&InputKeys::new(offset))?);

        assert_eq!(
            gc.verify(&InputKeys::new(pairs[1..].to_vec())),
            Err(Error::NotAllInputsSet)
        );
    }
    Ok(())
}

#[test]
fn test_cheat_detection() -> Result<(), Error> {
    for config in configs() {
        let (mut garbler, values) = garbled(&config)?;

        let mut evaluator = GarbledCircuit::new(garbler.circuit().clone(), &config)?;
        evaluator.set_garbled_tables(garbler.take_garbled_tables())?;
        evaluator.set_translation_table(values.translation_table().clone())?;
        let mut inputs =
            evaluator.garbled_input_from_ungarbled(&[true, false], values.input_keys(), 1)?;
        inputs.extend(evaluator.garbled_input_from_ungarbled(
            &[true, true],
            values.input_keys(),
            2,
        )?);
        evaluator.set_inputs(inputs);
        let mut output_keys = evaluator.compute()?;

        let expected = adder().eval_plain(&[&[true, false], &[true, true]])?;
        assert_eq!(
            garbler.verified_translate(&output_keys, values.output_keys())?,
            expected
        );

        output_keys[2] = output_keys[2] ^ WireKey::from(1u128 << 64);
        let err = garbler
            .verified_translate(&output_keys, values.output_keys())
            .unwrap_err();
        assert_eq!(err, Error::CheatAttempt { output: 2 });
        assert!(err.is_cheat_attempt());

        // translation without the keys cannot tell
        assert!(garbler.translate(&output_keys).is_ok());
    }
    Ok(())
}
