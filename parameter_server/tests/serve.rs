use std::num::NonZeroUsize;

use comms::{Deserialize, Serialize, SparseDelta, msg::Msg, specs::AggregatorSpec};
use parameter_server::{Aggregator, AggregatorBuilder};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};

const PARAMS: usize = 40;

fn aggregator(seed: u64) -> Aggregator {
    let mut spec = AggregatorSpec::new(NonZeroUsize::new(PARAMS).unwrap());
    spec.shard_size = NonZeroUsize::new(7).unwrap();
    spec.seed = Some(seed);

    AggregatorBuilder::new().build(&spec).unwrap()
}

fn exchange(agg: &Aggregator, request: &Msg) -> Msg<'static> {
    let mut buf = Vec::new();
    request.serialize(&mut buf).unwrap();

    let mut reply = Vec::new();
    agg.serve(&buf, &mut reply).unwrap();

    match Msg::deserialize(&reply).unwrap() {
        Msg::Err(e) => Msg::Err(e.into_owned().into()),
        Msg::Ack => Msg::Ack,
        Msg::Pull { density } => Msg::Pull { density },
        Msg::Upload(delta) => Msg::Upload(delta),
        Msg::Download(delta) => Msg::Download(delta),
    }
}

#[test]
fn wire_uploads_match_direct_uploads() {
    let mut rng = StdRng::seed_from_u64(21);

    let wired = aggregator(3);
    let direct = aggregator(3);
    assert_eq!(wired.pull_params(), direct.pull_params());

    for _ in 0..25 {
        let amount = rng.random_range(0..=PARAMS);
        let indices = index::sample(&mut rng, PARAMS, amount).into_vec();
        let values = (0..amount).map(|_| rng.random_range(-1.0..1.0)).collect();
        let delta = SparseDelta::new(indices, values).unwrap();

        assert_eq!(exchange(&wired, &Msg::Upload(delta.clone())), Msg::Ack);
        direct.apply_upload(&delta).unwrap();
    }

    assert_eq!(wired.pull_params(), direct.pull_params());
    assert_eq!(wired.update_counts(), direct.update_counts());
}

#[test]
fn pulled_download_is_ranked_by_update_count() {
    let agg = aggregator(8);

    for (times, index) in [(3, 17), (1, 2), (2, 30), (1, 0)] {
        for _ in 0..times {
            let delta = SparseDelta::new(vec![index], vec![0.5]).unwrap();
            assert_eq!(exchange(&agg, &Msg::Upload(delta)), Msg::Ack);
        }
    }

    let Msg::Download(delta) = exchange(&agg, &Msg::Pull { density: 0.1 }) else {
        panic!("expected a download");
    };

    assert_eq!(delta.indices(), [17, 30, 0, 2]);

    let params = agg.pull_params();
    for (i, value) in delta.iter() {
        assert_eq!(value, params[i]);
    }
}

#[test]
fn rejected_requests_leave_state_untouched() {
    let agg = aggregator(1);
    let params = agg.pull_params();

    let delta = SparseDelta::new(vec![0, PARAMS], vec![1., 1.]).unwrap();
    assert!(matches!(exchange(&agg, &Msg::Upload(delta)), Msg::Err(_)));
    assert!(matches!(exchange(&agg, &Msg::Pull { density: -0.5 }), Msg::Err(_)));
    assert!(matches!(exchange(&agg, &Msg::Ack), Msg::Err(_)));

    assert_eq!(agg.pull_params(), params);
    assert_eq!(agg.update_counts(), [0; PARAMS]);
}
