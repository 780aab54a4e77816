use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mztab::parser::{MzTabParser, ParserConfig};

const METADATA: &str = "\
MTD\tmzTab-version\t1.0.0
MTD\tmzTab-mode\tSummary
MTD\tmzTab-type\tIdentification
MTD\tdescription\tGenerated benchmark file
MTD\tms_run[1]-location\tfile:///data/run1.mzML
MTD\tpsm_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]
MTD\tfixed_mod[1]\t[UNIMOD, UNIMOD:4, Carbamidomethyl, ]
MTD\tvariable_mod[1]\t[UNIMOD, UNIMOD:35, Oxidation, ]
";

const PSH: &str = "PSH\tsequence\tPSM_ID\taccession\tunique\tdatabase\tdatabase_version\tsearch_engine\tsearch_engine_score[1]\tmodifications\tretention_time\tcharge\texp_mass_to_charge\tcalc_mass_to_charge\tspectra_ref\tpre\tpost\tstart\tend";

fn generate_test_mztab(num_psms: usize) -> String {
    const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
    let mut text = String::from(METADATA);
    text.push('\n');
    text.push_str(PSH);
    text.push('\n');

    for i in 0..num_psms {
        let sequence: String = (0..8 + i % 12)
            .map(|j| RESIDUES[(i * 7 + j * 3) % RESIDUES.len()] as char)
            .collect();
        let modification = if i % 3 == 0 { "2-UNIMOD:35" } else { "null" };
        text.push_str(&format!(
            "PSM\t{}\t{}\tP{:05}\t1\tUniProtKB\t2023_01\t[MS, MS:1001207, Mascot, ]\t{:.2}\t{}\t{:.3}\t2\t{:.4}\t{:.4}\tms_run[1]:scan={}\tK\tR\t{}\t{}\n",
            sequence,
            i + 1,
            i % 500,
            20.0 + (i % 50) as f64,
            modification,
            100.0 + i as f64 * 0.5,
            400.0 + (i % 300) as f64 * 1.7,
            400.0 + (i % 300) as f64 * 1.7 - 0.001,
            i + 1,
            10 + i % 100,
            10 + i % 100 + sequence.len() - 1,
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("mztab_parse_psm");

    for num_psms in [1_000, 10_000] {
        let text = generate_test_mztab(num_psms);
        let parser = MzTabParser::new(ParserConfig::default());

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_psms), &text, |b, text| {
            b.iter(|| {
                let result = parser.parse_str(black_box(text));
                black_box(result.file.psm.map(|t| t.len()));
            });
        });
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("mztab_write_psm");

    for num_psms in [1_000, 10_000] {
        let text = generate_test_mztab(num_psms);
        let file = MzTabParser::default().parse_str(&text).file;

        group.throughput(Throughput::Elements(num_psms as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_psms), &file, |b, file| {
            b.iter(|| {
                let mut buffer = Vec::with_capacity(text.len());
                file.write_to(&mut buffer).unwrap();
                black_box(buffer.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_write);
criterion_main!(benches);
