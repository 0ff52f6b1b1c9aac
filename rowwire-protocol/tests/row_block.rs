use rand::Rng;
use rowwire_catalog::{ColumnSchema, Schema};
use rowwire_datatype::DataType;
use rowwire_protocol::*;
use rowwire_storage::prelude::*;

fn three_col_schema() -> Schema {
    Schema::new(
        vec![
            ColumnSchema::new("col1", DataType::String, false),
            ColumnSchema::new("col2", DataType::String, false),
            ColumnSchema::new("col3", DataType::UInt32, true),
        ],
        1,
    )
    .unwrap()
}

#[test]
fn test_row_block_end_to_end() {
    let schema = three_col_schema();
    let mut rb = RowBuilder::new(&schema);
    let mut encoder = RowBlockEncoder::new(&schema);
    for i in 0..10u32 {
        rb.reset();
        rb.add_string(&format!("col1 {}", i));
        rb.add_string(&format!("col2 {}", i));
        if i % 2 == 1 {
            rb.add_null();
        } else {
            rb.add_u32(i);
        }
        encoder.append(&rb.row());
    }
    assert_eq!(10, encoder.num_rows());
    let block = encoder.finish();

    // schema and rows travel as payloads.
    let config = WireConfig::default();
    let schema_bytes = SchemaMessage::from(&schema).to_bytes(&config).unwrap();
    let block_bytes = block.to_bytes(&config).unwrap();

    let schema_msg = SchemaMessage::from_bytes(&config, &schema_bytes).unwrap();
    let decoded_schema = Schema::try_from(&schema_msg).unwrap();
    assert_eq!(schema, decoded_schema);
    assert_eq!(schema.to_string(), decoded_schema.to_string());

    let mut block = RowBlockMessage::from_bytes(&config, &block_bytes).unwrap();
    let rows = extract_rows_from_row_block(&decoded_schema, &mut block).unwrap();
    assert_eq!(10, rows.len());
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(Ok(Some(format!("col1 {}", i).as_str())), row.get_str(0));
        assert_eq!(Ok(Some(format!("col2 {}", i).as_str())), row.get_str(1));
        if i % 2 == 1 {
            assert!(row.is_null(2));
            assert_eq!(None, row.get::<u32>(2));
        } else {
            assert_eq!(Some(i as u32), row.get::<u32>(2));
        }
    }
}

#[test]
fn test_bad_row_size() {
    let schema = Schema::new(vec![ColumnSchema::new("c", DataType::String, false)], 1).unwrap();
    let mut block = RowBlockMessage {
        rows: vec![b'x'],
        indirect_data: vec![],
    };
    let err = extract_rows_from_row_block(&schema, &mut block).unwrap_err();
    assert_eq!(AppStatusCode::Corruption, err.code());
    assert_eq!(
        "Corruption: Row block has 1 bytes of data which is not a multiple of row size 16",
        err.to_string()
    );
}

#[test]
fn test_bad_indirect_slice() {
    let schema = Schema::new(vec![ColumnSchema::new("c", DataType::String, false)], 1).unwrap();
    let mut block = RowBlockMessage {
        rows: vec![b'x'; 16],
        indirect_data: vec![],
    };
    let err = extract_rows_from_row_block(&schema, &mut block).unwrap_err();
    assert_eq!(AppStatusCode::Corruption, err.code());
    assert!(err
        .message()
        .starts_with("Row #0 contained bad indirect slice for column c[string NOT NULL]"));
}

#[test]
fn test_indirect_slice_overflow() {
    let schema = Schema::new(vec![ColumnSchema::new("c", DataType::Binary, false)], 1).unwrap();
    let mut rows = Vec::with_capacity(16);
    rows.extend_from_slice(&u64::MAX.to_ne_bytes());
    rows.extend_from_slice(&1u64.to_ne_bytes());
    let mut block = RowBlockMessage {
        rows,
        indirect_data: b"abc".to_vec(),
    };
    let err = extract_rows_from_row_block(&schema, &mut block).unwrap_err();
    assert_eq!(
        format!(
            "Row #0 contained bad indirect slice for column c[binary NOT NULL]: ({}, 1)",
            u64::MAX
        ),
        err.message()
    );
}

#[test]
fn test_bad_slice_in_later_row() {
    let schema = Schema::new(
        vec![
            ColumnSchema::new("k", DataType::UInt8, false),
            ColumnSchema::new("v", DataType::String, true),
        ],
        1,
    )
    .unwrap();
    let mut rb = RowBuilder::new(&schema);
    let mut block = RowBlockMessage::default();
    for s in ["a", "bb"] {
        rb.reset();
        rb.add_u8(1);
        rb.add_string(s);
        add_row_to_row_block(&rb.row(), &mut block);
    }
    // drop last byte so that second slice is out of bound.
    block.indirect_data.pop();
    let err = extract_rows_from_row_block(&schema, &mut block).unwrap_err();
    assert!(err.message().starts_with("Row #1 contained bad indirect slice"));
    assert!(err.message().ends_with(": (1, 2)"));
}

#[test]
fn test_null_cell_zeroed_on_wire() {
    let schema = three_col_schema();
    let mut rb = RowBuilder::new(&schema);
    rb.add_string("a");
    rb.add_string("b");
    rb.add_u32(0xdead_beef);
    rb.reset();
    rb.add_string("c");
    rb.add_string("d");
    rb.add_null();
    let row = rb.row();
    // builder memory still holds value of previous row.
    assert_eq!(&0xdead_beefu32.to_ne_bytes()[..], row.cell(2));

    let mut block = RowBlockMessage::default();
    add_row_to_row_block(&row, &mut block);
    let encoded = ContiguousRowMut::new(&schema, &mut block.rows);
    assert!(encoded.is_null(2));
    assert!(encoded.cell(2).iter().all(|b| *b == 0));
}

#[test]
fn test_null_indirect_cell_zeroed_on_wire() {
    let schema = Schema::new(
        vec![
            ColumnSchema::new("id", DataType::UInt32, false),
            ColumnSchema::new("note", DataType::String, true),
        ],
        1,
    )
    .unwrap();
    let payload = b"secret".to_vec();
    let mut data = vec![0u8; schema.row_size()];
    {
        let mut row = ContiguousRowMut::new(&schema, &mut data);
        row.set(0, 7u32);
        row.set_null(1, true);
        // null flag stays set, but the slot refers to live memory.
        row.set_indirect(1, IndirectRef::of(&payload));
        assert!(row.is_null(1));
        assert!(row.cell(1).iter().any(|b| *b != 0));
    }
    let row = unsafe { ContiguousRow::new_unchecked(&schema, &data) };
    let mut block = RowBlockMessage::default();
    add_row_to_row_block(&row, &mut block);
    assert!(block.indirect_data.is_empty());
    let encoded = ContiguousRowMut::new(&schema, &mut block.rows);
    assert!(encoded.is_null(1));
    assert_eq!(&[0u8; 16][..], encoded.cell(1));

    let rows = extract_rows_from_row_block(&schema, &mut block).unwrap();
    assert_eq!(Some(7u32), rows[0].get::<u32>(0));
    assert_eq!(None, rows[0].get_bytes(1));
}

#[test]
fn test_decode_twice_fails() {
    let schema = three_col_schema();
    let mut rb = RowBuilder::new(&schema);
    rb.add_string("hello");
    rb.add_string("world");
    rb.add_u32(1);
    let mut block = RowBlockMessage::default();
    add_row_to_row_block(&rb.row(), &mut block);
    assert_eq!(1, extract_rows_from_row_block(&schema, &mut block).unwrap().len());
    // slots now hold addresses, which are not valid offsets.
    assert!(extract_rows_from_row_block(&schema, &mut block).is_err());
}

#[derive(Debug, Clone, PartialEq)]
enum Val {
    Null,
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Str(String),
    Bool(bool),
    F32(u32),
    F64(u64),
    Bin(Vec<u8>),
}

const ALL_TYPES: [DataType; 13] = [
    DataType::UInt8,
    DataType::Int8,
    DataType::UInt16,
    DataType::Int16,
    DataType::UInt32,
    DataType::Int32,
    DataType::UInt64,
    DataType::Int64,
    DataType::String,
    DataType::Bool,
    DataType::Float,
    DataType::Double,
    DataType::Binary,
];

fn rand_val<R: Rng>(rng: &mut R, ty: DataType, nullable: bool) -> Val {
    if nullable && rng.gen_bool(0.3) {
        return Val::Null;
    }
    match ty {
        DataType::UInt8 => Val::U8(rng.gen()),
        DataType::Int8 => Val::I8(rng.gen()),
        DataType::UInt16 => Val::U16(rng.gen()),
        DataType::Int16 => Val::I16(rng.gen()),
        DataType::UInt32 => Val::U32(rng.gen()),
        DataType::Int32 => Val::I32(rng.gen()),
        DataType::UInt64 => Val::U64(rng.gen()),
        DataType::Int64 => Val::I64(rng.gen()),
        DataType::String => {
            let len = rng.gen_range(0..20);
            Val::Str((0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect())
        }
        DataType::Bool => Val::Bool(rng.gen()),
        DataType::Float => Val::F32(rng.gen::<f32>().to_bits()),
        DataType::Double => Val::F64(rng.gen::<f64>().to_bits()),
        DataType::Binary => {
            let len = rng.gen_range(0..32);
            Val::Bin((0..len).map(|_| rng.gen()).collect())
        }
    }
}

fn add_val(rb: &mut RowBuilder<'_>, val: &Val) {
    match val {
        Val::Null => rb.add_null(),
        Val::U8(v) => rb.add_u8(*v),
        Val::I8(v) => rb.add_i8(*v),
        Val::U16(v) => rb.add_u16(*v),
        Val::I16(v) => rb.add_i16(*v),
        Val::U32(v) => rb.add_u32(*v),
        Val::I32(v) => rb.add_i32(*v),
        Val::U64(v) => rb.add_u64(*v),
        Val::I64(v) => rb.add_i64(*v),
        Val::Str(v) => rb.add_string(v),
        Val::Bool(v) => rb.add_bool(*v),
        Val::F32(v) => rb.add_f32(f32::from_bits(*v)),
        Val::F64(v) => rb.add_f64(f64::from_bits(*v)),
        Val::Bin(v) => rb.add_binary(v),
    }
}

fn read_val(row: &ContiguousRow<'_>, col_idx: usize) -> Val {
    if row.is_null(col_idx) {
        return Val::Null;
    }
    let v = match row.schema().column(col_idx).ty() {
        DataType::UInt8 => row.get::<u8>(col_idx).map(Val::U8),
        DataType::Int8 => row.get::<i8>(col_idx).map(Val::I8),
        DataType::UInt16 => row.get::<u16>(col_idx).map(Val::U16),
        DataType::Int16 => row.get::<i16>(col_idx).map(Val::I16),
        DataType::UInt32 => row.get::<u32>(col_idx).map(Val::U32),
        DataType::Int32 => row.get::<i32>(col_idx).map(Val::I32),
        DataType::UInt64 => row.get::<u64>(col_idx).map(Val::U64),
        DataType::Int64 => row.get::<i64>(col_idx).map(Val::I64),
        DataType::String => row.get_str(col_idx).unwrap().map(|s| Val::Str(s.to_string())),
        DataType::Bool => row.get::<bool>(col_idx).map(Val::Bool),
        DataType::Float => row.get::<f32>(col_idx).map(|f| Val::F32(f.to_bits())),
        DataType::Double => row.get::<f64>(col_idx).map(|f| Val::F64(f.to_bits())),
        DataType::Binary => row.get_bytes(col_idx).map(|b| Val::Bin(b.to_vec())),
    };
    v.unwrap()
}

#[test]
fn test_random_rows_round_trip() {
    let mut rng = rand::thread_rng();
    let mut columns = vec![ColumnSchema::new("id", DataType::UInt64, false)];
    for (i, ty) in ALL_TYPES.iter().enumerate() {
        columns.push(ColumnSchema::new(&format!("c{}", i), *ty, false));
        columns.push(ColumnSchema::new(&format!("n{}", i), *ty, true));
    }
    let schema = Schema::new(columns, 1).unwrap();
    assert_eq!(2, schema.null_bitmap_size());

    let mut rb = RowBuilder::new(&schema);
    let mut encoder = RowBlockEncoder::new(&schema);
    let mut expected = vec![];
    for id in 0..200u64 {
        rb.reset();
        let mut vals = vec![Val::U64(id)];
        for col in &schema.columns()[1..] {
            vals.push(rand_val(&mut rng, col.ty(), col.is_nullable()));
        }
        for v in &vals {
            add_val(&mut rb, v);
        }
        encoder.append(&rb.row());
        expected.push(vals);
    }
    let config = WireConfig::default();
    let bs = encoder.finish().to_bytes(&config).unwrap();
    let mut block = RowBlockMessage::from_bytes(&config, &bs).unwrap();
    let rows = extract_rows_from_row_block(&schema, &mut block).unwrap();
    assert_eq!(expected.len(), rows.len());
    for (row, vals) in rows.iter().zip(&expected) {
        let actual: Vec<_> = (0..schema.num_columns()).map(|i| read_val(row, i)).collect();
        assert_eq!(vals, &actual);
    }
}
