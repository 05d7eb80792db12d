use lumen_native::demos::asteroids::Asteroids;

fn main()
{
  lumen_native::launch::<Asteroids>();
}
