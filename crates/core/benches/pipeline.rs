use criterion::{Criterion, black_box, criterion_group, criterion_main};
use slimdown_core::{BatchInput, BatchOptions, Renderer, render_batch};

const DOCUMENT: &str = "# Release notes\n\n\
Some **bold** text, some _emphasis_ and a [link](http://example.com/some_page).\n\n\
* first item\n* second item with `inline_code`\n\n\
1. step one\n2. step two\n\n\
> quoted line\n> another line\n\n\
```\nfn main() {\n    println!(\"hi\");\n}\n```\n\n\
-----\n\n\
Closing ~~old~~ paragraph.";

fn adversarial(len: usize) -> String {
    let mut source = String::with_capacity(len * 12);
    for i in 0..len {
        source.push_str(if i % 2 == 0 { "*_**__~~` " } else { "x <a href='y'>" });
    }
    source
}

fn bench_render(c: &mut Criterion) {
    let renderer = Renderer::new();
    c.bench_function("render_document", |b| {
        b.iter(|| renderer.render(black_box(DOCUMENT)))
    });

    let hostile = adversarial(5_000);
    c.bench_function("render_adversarial_emphasis", |b| {
        b.iter(|| renderer.render(black_box(&hostile)))
    });

    let long_line = "_a_ ".repeat(50_000);
    c.bench_function("render_single_long_line", |b| {
        b.iter(|| renderer.render(black_box(&long_line)))
    });

    c.bench_function("render_batch_64", |b| {
        b.iter(|| {
            let inputs = (0..64)
                .map(|i| BatchInput::new(format!("doc-{i}"), DOCUMENT))
                .collect();
            render_batch(&renderer, inputs, &BatchOptions::default())
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
