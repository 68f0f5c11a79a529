use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formbind::{Bindable, Mapper, Values};

#[derive(Debug, Default, Bindable)]
struct User {
    #[form("firstname")]
    firstname: String,
    #[form("lastname")]
    lastname: String,
    #[form("email")]
    email: String,
    #[form("age")]
    age: i32,
}

fn bench_bind(c: &mut Criterion) {
    let mapper = Mapper::new();
    let form = Values::parse_query("firstname=Feng&lastname=Yang&email=yangfeng%40qq.com&age=10");

    // Warm the schema cache so the loop measures the bind hot path.
    let mut warm = User::default();
    mapper.bind(&form, &mut warm).unwrap();

    c.bench_function("bind_struct", |b| {
        b.iter(|| {
            let mut user = User::default();
            mapper.bind(black_box(&form), &mut user).unwrap();
            user
        })
    });

    c.bench_function("encode_struct", |b| {
        b.iter(|| mapper.encode(black_box(&warm)).unwrap())
    });
}

criterion_group!(benches, bench_bind);
criterion_main!(benches);
